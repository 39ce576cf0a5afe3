//! Stage definitions and ordered stage sets.

use std::fmt;
use std::sync::Arc;

use onboard_types::StageId;
use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, ProgressResult};
use crate::predicates::StagePredicate;

/// The modal or form a dashboard opens when the user clicks the stage they
/// should act on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Remediation {
    /// Nothing to open (baseline stage).
    None,
    CommercialRegistration,
    OwnerDetails,
    ReferralInvite,
    TermsAgreement,
    FinancialInfo,
    UtilityAuthorization,
    DocumentUpload,
    FacilityVerification,
    FacilityDetails,
}

impl fmt::Display for Remediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Remediation::None => "none",
            Remediation::CommercialRegistration => "commercial registration",
            Remediation::OwnerDetails => "owner details",
            Remediation::ReferralInvite => "referral invite",
            Remediation::TermsAgreement => "terms agreement",
            Remediation::FinancialInfo => "financial info",
            Remediation::UtilityAuthorization => "utility authorization",
            Remediation::DocumentUpload => "document upload",
            Remediation::FacilityVerification => "facility verification",
            Remediation::FacilityDetails => "facility details",
        };
        write!(f, "{}", name)
    }
}

/// How a stage is decided.
#[derive(Clone)]
pub enum StageCheck {
    /// Implicit "account created" stage; always true, never evaluated.
    Baseline,
    /// Asynchronous check against remote or in-memory resources.
    Predicate(Arc<dyn StagePredicate>),
}

impl fmt::Debug for StageCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageCheck::Baseline => write!(f, "Baseline"),
            StageCheck::Predicate(p) => write!(f, "Predicate({})", p.name()),
        }
    }
}

/// One onboarding milestone.
#[derive(Debug, Clone)]
pub struct StageDefinition {
    pub id: StageId,
    pub label: String,
    pub check: StageCheck,
    pub remediation: Remediation,
}

impl StageDefinition {
    pub fn is_baseline(&self) -> bool {
        matches!(self.check, StageCheck::Baseline)
    }
}

/// Ordered, dense, 1-based list of stages for one dashboard variant.
///
/// Stage 1 is always the baseline.
#[derive(Debug, Clone)]
pub struct StageSet {
    stages: Vec<StageDefinition>,
}

impl StageSet {
    /// Start a stage set; the builder assigns ids in insertion order.
    pub fn builder(baseline_label: impl Into<String>) -> StageSetBuilder {
        StageSetBuilder {
            stages: vec![StageDefinition {
                id: StageId::FIRST,
                label: baseline_label.into(),
                check: StageCheck::Baseline,
                remediation: Remediation::None,
            }],
        }
    }

    /// Validate explicitly numbered definitions.
    pub fn from_definitions(stages: Vec<StageDefinition>) -> ProgressResult<Self> {
        if stages.is_empty() {
            return Err(ProgressError::InvalidStageSet("no stages".into()));
        }

        for (index, stage) in stages.iter().enumerate() {
            if stage.id.index() != index {
                return Err(ProgressError::InvalidStageSet(format!(
                    "stage at position {} has id {}; ids must be dense and start at 1",
                    index + 1,
                    stage.id
                )));
            }
        }

        if !stages[0].is_baseline() {
            return Err(ProgressError::InvalidStageSet(
                "stage 1 must be the baseline".into(),
            ));
        }

        if let Some(extra) = stages.iter().skip(1).find(|s| s.is_baseline()) {
            return Err(ProgressError::InvalidStageSet(format!(
                "stage {} is a second baseline",
                extra.id
            )));
        }

        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of stages as a stage count.
    pub fn total(&self) -> u32 {
        self.stages.len() as u32
    }

    pub fn get(&self, id: StageId) -> Option<&StageDefinition> {
        self.stages.get(id.index())
    }

    pub fn stage(&self, id: StageId) -> ProgressResult<&StageDefinition> {
        self.get(id).ok_or(ProgressError::UnknownStage(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDefinition> {
        self.stages.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Builder for [`StageSet`].
pub struct StageSetBuilder {
    stages: Vec<StageDefinition>,
}

impl StageSetBuilder {
    /// Append a predicate stage with the next id.
    pub fn stage(
        mut self,
        label: impl Into<String>,
        predicate: Arc<dyn StagePredicate>,
        remediation: Remediation,
    ) -> Self {
        let id = StageId::new(self.stages.len() as u32 + 1).unwrap_or(StageId::FIRST);
        self.stages.push(StageDefinition {
            id,
            label: label.into(),
            check: StageCheck::Predicate(predicate),
            remediation,
        });
        self
    }

    pub fn build(self) -> StageSet {
        StageSet {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::FnPredicate;

    fn always(value: bool) -> Arc<dyn StagePredicate> {
        Arc::new(FnPredicate::new("const", move |_, _| async move { Ok(value) }))
    }

    #[test]
    fn test_builder_assigns_dense_ids() {
        let set = StageSet::builder("Account created")
            .stage("Terms", always(true), Remediation::TermsAgreement)
            .stage("Meters", always(false), Remediation::UtilityAuthorization)
            .build();

        assert_eq!(set.total(), 3);
        let ids: Vec<u32> = set.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(set.get(StageId::FIRST).unwrap().is_baseline());
        assert_eq!(set.labels(), vec!["Account created", "Terms", "Meters"]);
    }

    #[test]
    fn test_from_definitions_rejects_gaps() {
        let stages = vec![
            StageDefinition {
                id: StageId::FIRST,
                label: "Account".into(),
                check: StageCheck::Baseline,
                remediation: Remediation::None,
            },
            StageDefinition {
                id: StageId::new(3).unwrap(),
                label: "Gap".into(),
                check: StageCheck::Predicate(always(true)),
                remediation: Remediation::TermsAgreement,
            },
        ];
        assert!(matches!(
            StageSet::from_definitions(stages),
            Err(ProgressError::InvalidStageSet(_))
        ));
    }

    #[test]
    fn test_from_definitions_requires_baseline_first() {
        let stages = vec![StageDefinition {
            id: StageId::FIRST,
            label: "Terms".into(),
            check: StageCheck::Predicate(always(true)),
            remediation: Remediation::TermsAgreement,
        }];
        assert!(StageSet::from_definitions(stages).is_err());
        assert!(StageSet::from_definitions(Vec::new()).is_err());
    }

    #[test]
    fn test_unknown_stage_lookup() {
        let set = StageSet::builder("Account created").build();
        let missing = StageId::new(2).unwrap();
        assert!(matches!(set.stage(missing), Err(ProgressError::UnknownStage(id)) if id == missing));
    }
}
