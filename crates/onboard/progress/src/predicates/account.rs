//! Predicates over the user's account records.

use std::sync::Arc;

use async_trait::async_trait;
use onboard_gateway::ResourceGateway;
use onboard_types::{AuthContext, ResourceContext};
use tracing::debug;

use super::StagePredicate;
use crate::checks::is_present;
use crate::error::PredicateResult;

/// Which commercial-profile field marks the stage done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// Operator registration.
    OwnerFullName,
    /// Commercial facility owner details.
    OwnerAddress,
}

/// Commercial profile has the given field filled in.
pub struct CommercialProfilePredicate {
    gateway: Arc<dyn ResourceGateway>,
    field: ProfileField,
}

impl CommercialProfilePredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>, field: ProfileField) -> Self {
        Self { gateway, field }
    }
}

#[async_trait]
impl StagePredicate for CommercialProfilePredicate {
    fn name(&self) -> &str {
        match self.field {
            ProfileField::OwnerFullName => "commercial-profile.owner-full-name",
            ProfileField::OwnerAddress => "commercial-profile.owner-address",
        }
    }

    async fn check(&self, auth: &AuthContext, _: &ResourceContext) -> PredicateResult<bool> {
        let data = self.gateway.commercial_user(auth).await?;
        let Some(user) = data.commercial_user else {
            debug!(user_id = %auth.user_id, "No commercial profile on record");
            return Ok(false);
        };

        let value = match self.field {
            ProfileField::OwnerFullName => user.owner_full_name.as_deref(),
            ProfileField::OwnerAddress => user.owner_address.as_deref(),
        };
        Ok(is_present(value))
    }
}

/// The user was referred by someone.
pub struct ReferralPredicate {
    gateway: Arc<dyn ResourceGateway>,
}

impl ReferralPredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl StagePredicate for ReferralPredicate {
    fn name(&self) -> &str {
        "referral.inviter"
    }

    async fn check(&self, auth: &AuthContext, _: &ResourceContext) -> PredicateResult<bool> {
        let data = self.gateway.referral(auth).await?;
        Ok(is_present(
            data.referral
                .as_ref()
                .and_then(|r| r.inviter_id.as_deref()),
        ))
    }
}

/// Terms and conditions accepted.
pub struct TermsAcceptedPredicate {
    gateway: Arc<dyn ResourceGateway>,
}

impl TermsAcceptedPredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl StagePredicate for TermsAcceptedPredicate {
    fn name(&self) -> &str {
        "agreement.terms-accepted"
    }

    async fn check(&self, auth: &AuthContext, _: &ResourceContext) -> PredicateResult<bool> {
        let data = self.gateway.agreement(auth).await?;
        Ok(data.terms_accepted == Some(true))
    }
}

/// Financial information submitted.
pub struct FinancialInfoPredicate {
    gateway: Arc<dyn ResourceGateway>,
}

impl FinancialInfoPredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl StagePredicate for FinancialInfoPredicate {
    fn name(&self) -> &str {
        "financial-info"
    }

    async fn check(&self, auth: &AuthContext, _: &ResourceContext) -> PredicateResult<bool> {
        let data = self.gateway.financial_info(auth).await?;
        Ok(data.financial_info.is_some())
    }
}

/// At least one utility meter authorized.
pub struct MetersAuthorizedPredicate {
    gateway: Arc<dyn ResourceGateway>,
}

impl MetersAuthorizedPredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl StagePredicate for MetersAuthorizedPredicate {
    fn name(&self) -> &str {
        "user-meters"
    }

    async fn check(&self, auth: &AuthContext, _: &ResourceContext) -> PredicateResult<bool> {
        let entries = self.gateway.user_meters(auth).await?;
        let authorized = entries.iter().filter(|e| e.has_meters()).count();
        debug!(user_id = %auth.user_id, entries = entries.len(), authorized, "Checked user meters");
        Ok(authorized > 0)
    }
}
