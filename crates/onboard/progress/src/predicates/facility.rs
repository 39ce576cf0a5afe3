//! Predicates over a facility record.
//!
//! Facility views usually hold the record already; the predicate only goes
//! to the gateway when the context carries just the facility id.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use onboard_gateway::ResourceGateway;
use onboard_types::{AuthContext, FacilityRecord, ResourceContext};
use tracing::{debug, instrument};

use super::StagePredicate;
use crate::checks;
use crate::error::{PredicateError, PredicateResult};

/// Local check applied to a facility record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityCheck {
    /// `status` is `verified`.
    Verified,
    /// Every tracked document is `APPROVED`.
    DocumentsApproved,
    /// Verified, or every tracked document approved.
    VerifiedOrDocumentsApproved,
    /// Every required detail field filled in.
    RequiredFieldsComplete,
}

impl FacilityCheck {
    pub fn name(self) -> &'static str {
        match self {
            FacilityCheck::Verified => "facility.verified",
            FacilityCheck::DocumentsApproved => "facility.documents-approved",
            FacilityCheck::VerifiedOrDocumentsApproved => "facility.verified-or-approved",
            FacilityCheck::RequiredFieldsComplete => "facility.required-fields",
        }
    }

    pub fn apply(self, facility: &FacilityRecord) -> bool {
        match self {
            FacilityCheck::Verified => checks::is_verified(facility),
            FacilityCheck::DocumentsApproved => checks::documents_approved(facility),
            FacilityCheck::VerifiedOrDocumentsApproved => {
                checks::is_verified_or_documents_approved(facility)
            }
            FacilityCheck::RequiredFieldsComplete => checks::required_fields_complete(facility),
        }
    }
}

/// Applies a [`FacilityCheck`] to the context's facility.
pub struct FacilityPredicate {
    gateway: Arc<dyn ResourceGateway>,
    check: FacilityCheck,
}

impl FacilityPredicate {
    pub fn new(gateway: Arc<dyn ResourceGateway>, check: FacilityCheck) -> Self {
        Self { gateway, check }
    }

    /// The in-memory record if present, otherwise a fresh fetch by id.
    async fn resolve<'a>(
        &self,
        auth: &AuthContext,
        resources: &'a ResourceContext,
    ) -> PredicateResult<Cow<'a, FacilityRecord>> {
        if let Some(facility) = &resources.facility {
            return Ok(Cow::Borrowed(facility));
        }

        let facility_id = resources
            .facility_id
            .as_ref()
            .ok_or_else(|| PredicateError::MissingFacility(self.check.name().to_string()))?;

        debug!(facility_id = %facility_id, kind = %resources.facility_kind, "Fetching facility");
        let record = self
            .gateway
            .facility(auth, resources.facility_kind, facility_id)
            .await?;
        Ok(Cow::Owned(record))
    }
}

#[async_trait]
impl StagePredicate for FacilityPredicate {
    fn name(&self) -> &str {
        self.check.name()
    }

    #[instrument(skip_all, fields(check = self.check.name()))]
    async fn check(&self, auth: &AuthContext, resources: &ResourceContext) -> PredicateResult<bool> {
        let facility = self.resolve(auth, resources).await?;
        Ok(self.check.apply(&facility))
    }
}
