//! Registry of progress watchers for all mounted views.
//!
//! The dashboard can show several progress bars at once (operator navbar
//! plus one or more facility detail panes). The monitor keeps one watcher
//! per view so each can be refreshed or torn down independently.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use onboard_gateway::ResourceGateway;
use onboard_types::{AuthContext, DashboardVariant, ResourceContext};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::config::PollingConfig;
use crate::error::{ProgressError, ProgressResult};
use crate::evaluator::Evaluator;
use crate::stage::StageSet;
use crate::watcher::{ProgressEvent, ProgressSnapshot, ProgressWatcher};

/// Identifies one mounted progress view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchKey {
    pub variant: DashboardVariant,
    /// User id for the operator navbar, facility id for facility views.
    pub subject: String,
}

impl WatchKey {
    pub fn new(variant: DashboardVariant, subject: impl Into<String>) -> Self {
        Self {
            variant,
            subject: subject.into(),
        }
    }

    /// Key for a view: the facility id when there is one, else the user id.
    pub fn for_view(
        variant: DashboardVariant,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> Self {
        let subject = resources
            .facility_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| auth.user_id.as_str().to_string());
        Self::new(variant, subject)
    }
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.variant, self.subject)
    }
}

/// Starts, refreshes and stops watchers by [`WatchKey`].
pub struct ProgressMonitor {
    evaluator: Arc<Evaluator>,
    gateway: Arc<dyn ResourceGateway>,
    polling: PollingConfig,
    watchers: DashMap<WatchKey, ProgressWatcher>,
}

impl ProgressMonitor {
    pub fn new(
        evaluator: Arc<Evaluator>,
        gateway: Arc<dyn ResourceGateway>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            evaluator,
            gateway,
            polling,
            watchers: DashMap::new(),
        }
    }

    /// Start watching a view with its variant's stage table.
    #[instrument(skip(self, auth, resources))]
    pub fn watch(
        &self,
        key: WatchKey,
        auth: AuthContext,
        resources: ResourceContext,
    ) -> ProgressResult<broadcast::Receiver<ProgressEvent>> {
        let stage_set = Arc::new(StageSet::for_variant(key.variant, self.gateway.clone()));
        self.watch_with(key, stage_set, auth, resources)
    }

    /// Start watching a view with a custom stage set.
    pub fn watch_with(
        &self,
        key: WatchKey,
        stage_set: Arc<StageSet>,
        auth: AuthContext,
        resources: ResourceContext,
    ) -> ProgressResult<broadcast::Receiver<ProgressEvent>> {
        if self.watchers.contains_key(&key) {
            return Err(ProgressError::WatcherAlreadyRunning(key));
        }

        info!(key = %key, "Mounting progress watcher");

        let watcher = ProgressWatcher::spawn(
            self.evaluator.clone(),
            stage_set,
            auth,
            resources,
            &self.polling,
        );
        let events = watcher.subscribe();
        self.watchers.insert(key, watcher);

        Ok(events)
    }

    /// Re-evaluate a view after a mutating action.
    pub fn refresh(&self, key: &WatchKey) -> ProgressResult<()> {
        let watcher = self
            .watchers
            .get(key)
            .ok_or_else(|| ProgressError::WatcherNotFound(key.clone()))?;
        watcher.refresh();
        Ok(())
    }

    /// Re-evaluate a view against an updated facility record or id.
    pub fn refresh_with(&self, key: &WatchKey, resources: ResourceContext) -> ProgressResult<()> {
        let watcher = self
            .watchers
            .get(key)
            .ok_or_else(|| ProgressError::WatcherNotFound(key.clone()))?;
        watcher.refresh_with(resources);
        Ok(())
    }

    /// Tear down a view's watcher.
    pub fn unwatch(&self, key: &WatchKey) -> ProgressResult<()> {
        let (_, watcher) = self
            .watchers
            .remove(key)
            .ok_or_else(|| ProgressError::WatcherNotFound(key.clone()))?;

        info!(key = %key, "Unmounting progress watcher");
        watcher.stop();
        Ok(())
    }

    pub fn latest(&self, key: &WatchKey) -> Option<ProgressSnapshot> {
        self.watchers.get(key).and_then(|w| w.latest())
    }

    pub fn subscribe(&self, key: &WatchKey) -> ProgressResult<broadcast::Receiver<ProgressEvent>> {
        self.watchers
            .get(key)
            .map(|w| w.subscribe())
            .ok_or_else(|| ProgressError::WatcherNotFound(key.clone()))
    }

    pub fn is_watching(&self, key: &WatchKey) -> bool {
        self.watchers.contains_key(key)
    }

    /// Keys of all mounted views.
    pub fn watched(&self) -> Vec<WatchKey> {
        self.watchers.iter().map(|r| r.key().clone()).collect()
    }

    /// Stop every watcher.
    pub fn stop_all(&self) {
        info!("Stopping all progress watchers");

        for item in self.watchers.iter() {
            item.value().stop();
        }
        self.watchers.clear();
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for item in self.watchers.iter() {
            item.value().stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_types::FacilityKind;

    #[test]
    fn test_watch_key_for_operator_uses_user() {
        let auth = AuthContext::new("u-1", "tok");
        let key = WatchKey::for_view(DashboardVariant::Operator, &auth, &ResourceContext::none());
        assert_eq!(key.subject, "u-1");
        assert_eq!(key.to_string(), "operator/u-1");
    }

    #[test]
    fn test_watch_key_for_facility_uses_facility() {
        let auth = AuthContext::new("u-1", "tok");
        let resources = ResourceContext::with_facility_id(FacilityKind::Commercial, "f-3");
        let key = WatchKey::for_view(DashboardVariant::CommercialFacility, &auth, &resources);
        assert_eq!(key.to_string(), "commercial/f-3");
    }
}
