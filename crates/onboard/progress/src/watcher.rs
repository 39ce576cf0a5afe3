//! Polling watcher for one mounted progress view.
//!
//! A watcher owns a background task that evaluates the stage set when it
//! starts, on every polling tick and whenever [`ProgressWatcher::refresh`] is
//! called after a mutating action. Ticks that arrive while an evaluation is
//! still in flight are skipped, so results are never overwritten out of
//! order. A refresh that arrives mid-evaluation is queued and runs as soon as
//! the current result is published. Dropping the watcher cancels the task.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use onboard_types::{AuthContext, ProgressState, ResourceContext, StageId};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, Instrument};

use crate::config::PollingConfig;
use crate::evaluator::Evaluator;
use crate::stage::StageSet;

/// What started an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Polling tick; the first tick fires on start.
    Tick,
    /// On-demand refresh.
    Refresh,
}

/// A published evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub state: ProgressState,
    pub evaluated_at: DateTime<Utc>,
    /// Increments with every completed evaluation, starting at 1.
    pub sequence: u64,
    pub trigger: Trigger,
}

/// Events emitted by a watcher.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// An evaluation finished.
    Evaluated(Box<ProgressSnapshot>),

    /// The current stage moved forward.
    StageAdvanced { from: StageId, to: StageId },

    /// The current stage moved backward, e.g. a document was rejected.
    StageRegressed { from: StageId, to: StageId },

    /// A polling tick arrived while an evaluation was in flight.
    TickSkipped,

    /// A refresh arrived while an evaluation was in flight; it runs next.
    RefreshQueued,

    /// The watcher was stopped.
    Stopped,
}

/// Handle to a running watcher task.
pub struct ProgressWatcher {
    state_rx: watch::Receiver<Option<ProgressSnapshot>>,
    resources_tx: watch::Sender<ResourceContext>,
    event_tx: broadcast::Sender<ProgressEvent>,
    refresh: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl ProgressWatcher {
    /// Spawn the polling task. Must be called inside a tokio runtime.
    pub fn spawn(
        evaluator: Arc<Evaluator>,
        stage_set: Arc<StageSet>,
        auth: AuthContext,
        resources: ResourceContext,
        polling: &PollingConfig,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(None);
        let (event_tx, _) = broadcast::channel(polling.event_capacity.max(1));
        let (resources_tx, resources_rx) = watch::channel(resources);
        let refresh = Arc::new(Notify::new());

        let span = tracing::info_span!("progress_watcher", user_id = %auth.user_id);
        let task = WatchTask {
            evaluator,
            stage_set,
            auth,
            resources: resources_rx,
            interval: polling.interval(),
            state_tx,
            event_tx: event_tx.clone(),
            refresh: refresh.clone(),
        };
        let handle = tokio::spawn(task.run().instrument(span));

        Self {
            state_rx,
            resources_tx,
            event_tx,
            refresh,
            handle,
        }
    }

    /// Re-evaluate now, or right after the evaluation in flight.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Replace the view's resources, e.g. the facility record after an
    /// upload, and re-evaluate against them.
    pub fn refresh_with(&self, resources: ResourceContext) {
        self.resources_tx.send_replace(resources);
        self.refresh();
    }

    /// Latest published snapshot, `None` until the first evaluation finishes.
    pub fn latest(&self) -> Option<ProgressSnapshot> {
        self.state_rx.borrow().clone()
    }

    /// Receiver that observes every new snapshot.
    pub fn subscribe_state(&self) -> watch::Receiver<Option<ProgressSnapshot>> {
        self.state_rx.clone()
    }

    /// Subscribe to watcher events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.event_tx.subscribe()
    }

    /// Wait for the next snapshot newer than the one last seen by `rx`.
    pub async fn next_snapshot(
        rx: &mut watch::Receiver<Option<ProgressSnapshot>>,
    ) -> Option<ProgressSnapshot> {
        loop {
            rx.changed().await.ok()?;
            if let Some(snapshot) = rx.borrow_and_update().clone() {
                return Some(snapshot);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the polling task. In-flight requests are dropped.
    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            let _ = self.event_tx.send(ProgressEvent::Stopped);
            info!("Stopped progress watcher");
        }
    }
}

impl Drop for ProgressWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct WatchTask {
    evaluator: Arc<Evaluator>,
    stage_set: Arc<StageSet>,
    auth: AuthContext,
    resources: watch::Receiver<ResourceContext>,
    interval: std::time::Duration,
    state_tx: watch::Sender<Option<ProgressSnapshot>>,
    event_tx: broadcast::Sender<ProgressEvent>,
    refresh: Arc<Notify>,
}

impl WatchTask {
    async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Starting progress watcher");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<(Trigger, BoxFuture<'static, ProgressState>)> = None;
        let mut refresh_queued = false;
        let mut sequence = 0u64;
        let mut previous: Option<StageId> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.start(&mut in_flight, &mut refresh_queued, Trigger::Tick);
                }
                _ = self.refresh.notified() => {
                    self.start(&mut in_flight, &mut refresh_queued, Trigger::Refresh);
                }
                (trigger, state) = poll_in_flight(&mut in_flight) => {
                    in_flight = None;
                    sequence += 1;
                    self.publish(trigger, state, sequence, &mut previous);

                    if std::mem::take(&mut refresh_queued) {
                        self.start(&mut in_flight, &mut refresh_queued, Trigger::Refresh);
                    }
                }
            }
        }
    }

    fn start(
        &self,
        in_flight: &mut Option<(Trigger, BoxFuture<'static, ProgressState>)>,
        refresh_queued: &mut bool,
        trigger: Trigger,
    ) {
        if in_flight.is_some() {
            let event = match trigger {
                Trigger::Tick => {
                    debug!("Evaluation in flight, skipping tick");
                    ProgressEvent::TickSkipped
                }
                Trigger::Refresh => {
                    debug!("Evaluation in flight, queueing refresh");
                    *refresh_queued = true;
                    ProgressEvent::RefreshQueued
                }
            };
            let _ = self.event_tx.send(event);
            return;
        }

        // Owned inputs: the resources may be replaced while this runs.
        let evaluator = self.evaluator.clone();
        let stage_set = self.stage_set.clone();
        let auth = self.auth.clone();
        let resources = self.resources.borrow().clone();

        let future = async move { evaluator.evaluate(&stage_set, &auth, &resources).await }.boxed();
        *in_flight = Some((trigger, future));
    }

    fn publish(
        &self,
        trigger: Trigger,
        state: ProgressState,
        sequence: u64,
        previous: &mut Option<StageId>,
    ) {
        let current = state.current_stage;

        if let Some(from) = *previous {
            if current > from {
                info!(from = %from, to = %current, "Onboarding stage advanced");
                let _ = self
                    .event_tx
                    .send(ProgressEvent::StageAdvanced { from, to: current });
            } else if current < from {
                info!(from = %from, to = %current, "Onboarding stage regressed");
                let _ = self
                    .event_tx
                    .send(ProgressEvent::StageRegressed { from, to: current });
            }
        }
        *previous = Some(current);

        let snapshot = ProgressSnapshot {
            state,
            evaluated_at: Utc::now(),
            sequence,
            trigger,
        };

        let _ = self
            .event_tx
            .send(ProgressEvent::Evaluated(Box::new(snapshot.clone())));
        self.state_tx.send_replace(Some(snapshot));
    }
}

/// Resolves with the in-flight evaluation, or never when idle.
async fn poll_in_flight(
    in_flight: &mut Option<(Trigger, BoxFuture<'static, ProgressState>)>,
) -> (Trigger, ProgressState) {
    match in_flight {
        Some((trigger, future)) => {
            let state = future.await;
            (*trigger, state)
        }
        None => std::future::pending().await,
    }
}
