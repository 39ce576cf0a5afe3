//! Declarative stage tables for each dashboard variant.
//!
//! The three dashboards share one evaluator; only these tables differ.

use std::sync::Arc;

use onboard_gateway::ResourceGateway;
use onboard_types::{AuthContext, DashboardVariant, ResourceContext};
use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluator;
use crate::predicates::{
    CommercialProfilePredicate, FacilityCheck, FacilityPredicate, FinancialInfoPredicate,
    MetersAuthorizedPredicate, ProfileField, ReferralPredicate, StagePredicate,
    TermsAcceptedPredicate,
};
use crate::stage::{Remediation, StageSet};

const ACCOUNT_CREATED: &str = "Account created";

impl StageSet {
    /// The stage table for a dashboard variant.
    pub fn for_variant(variant: DashboardVariant, gateway: Arc<dyn ResourceGateway>) -> StageSet {
        match variant {
            DashboardVariant::Operator => operator_stages(gateway),
            DashboardVariant::CommercialFacility => commercial_stages(gateway),
            DashboardVariant::ResidentialFacility => residential_stages(gateway),
        }
    }
}

fn operator_stages(gateway: Arc<dyn ResourceGateway>) -> StageSet {
    StageSet::builder(ACCOUNT_CREATED)
        .stage(
            "Commercial registration",
            Arc::new(CommercialProfilePredicate::new(
                gateway.clone(),
                ProfileField::OwnerFullName,
            )),
            Remediation::CommercialRegistration,
        )
        .stage(
            "Referral linked",
            Arc::new(ReferralPredicate::new(gateway.clone())),
            Remediation::ReferralInvite,
        )
        .stage(
            "Terms accepted",
            Arc::new(TermsAcceptedPredicate::new(gateway)),
            Remediation::TermsAgreement,
        )
        .build()
}

fn commercial_stages(gateway: Arc<dyn ResourceGateway>) -> StageSet {
    StageSet::builder(ACCOUNT_CREATED)
        .stage(
            "Owner details",
            Arc::new(CommercialProfilePredicate::new(
                gateway.clone(),
                ProfileField::OwnerAddress,
            )),
            Remediation::OwnerDetails,
        )
        .stage(
            "Terms accepted",
            Arc::new(TermsAcceptedPredicate::new(gateway.clone())),
            Remediation::TermsAgreement,
        )
        .stage(
            "Financial info",
            Arc::new(FinancialInfoPredicate::new(gateway.clone())),
            Remediation::FinancialInfo,
        )
        .stage(
            "Utility authorization",
            Arc::new(MetersAuthorizedPredicate::new(gateway.clone())),
            Remediation::UtilityAuthorization,
        )
        .stage(
            "Facility verified",
            Arc::new(FacilityPredicate::new(
                gateway,
                FacilityCheck::VerifiedOrDocumentsApproved,
            )),
            Remediation::DocumentUpload,
        )
        .build()
}

fn residential_stages(gateway: Arc<dyn ResourceGateway>) -> StageSet {
    StageSet::builder(ACCOUNT_CREATED)
        .stage(
            "Terms accepted",
            Arc::new(TermsAcceptedPredicate::new(gateway.clone())),
            Remediation::TermsAgreement,
        )
        .stage(
            "Financial info",
            Arc::new(FinancialInfoPredicate::new(gateway.clone())),
            Remediation::FinancialInfo,
        )
        .stage(
            "Utility authorization",
            Arc::new(MetersAuthorizedPredicate::new(gateway.clone())),
            Remediation::UtilityAuthorization,
        )
        .stage(
            "Facility verified",
            Arc::new(FacilityPredicate::new(gateway.clone(), FacilityCheck::Verified)),
            Remediation::FacilityVerification,
        )
        .stage(
            "Facility details complete",
            Arc::new(FacilityPredicate::new(
                gateway,
                FacilityCheck::RequiredFieldsComplete,
            )),
            Remediation::FacilityDetails,
        )
        .build()
}

/// Dashboard actions gated on onboarding data without being stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionGate {
    /// Operators may invite collaborators once a meter is authorized.
    InviteCollaborator,
}

impl ActionGate {
    /// Predicate that opens the gate.
    pub fn predicate(self, gateway: Arc<dyn ResourceGateway>) -> Arc<dyn StagePredicate> {
        match self {
            ActionGate::InviteCollaborator => Arc::new(MetersAuthorizedPredicate::new(gateway)),
        }
    }
}

impl Evaluator {
    /// Whether a gated action is enabled. Fails closed like a stage does.
    pub async fn evaluate_gate(
        &self,
        gate: ActionGate,
        gateway: Arc<dyn ResourceGateway>,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> bool {
        let predicate = gate.predicate(gateway);
        self.check(predicate.as_ref(), auth, resources).await
    }
}

/// Evaluate a gate with the default configuration.
pub async fn evaluate_gate(
    gate: ActionGate,
    gateway: Arc<dyn ResourceGateway>,
    auth: &AuthContext,
    resources: &ResourceContext,
) -> bool {
    Evaluator::default()
        .evaluate_gate(gate, gateway, auth, resources)
        .await
}

impl std::fmt::Display for ActionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionGate::InviteCollaborator => write!(f, "invite-collaborator"),
        }
    }
}
