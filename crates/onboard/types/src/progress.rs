//! Derived onboarding progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::StageId;

/// Which onboarding stages are satisfied for one user or facility.
///
/// Invariants:
/// - stage 1 is always in `completed_stages`
/// - `1 <= current_stage <= total_stages`
/// - `next_stage == min(current_stage + 1, total_stages)`
///
/// The state is pure derived UI state: it is recomputed on every mount and
/// poll and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    /// Stage ids whose checks passed, always including stage 1.
    pub completed_stages: BTreeSet<StageId>,

    /// Stage the user has reached.
    pub current_stage: StageId,

    /// Stage the user should act on next; equals `current_stage` once terminal.
    pub next_stage: StageId,

    /// Number of stages in the originating stage set.
    pub total_stages: u32,
}

impl ProgressState {
    /// The "stage 1 of N" state used when nothing beyond account creation
    /// could be confirmed.
    pub fn baseline(total_stages: u32) -> Self {
        Self::from_parts(BTreeSet::new(), StageId::FIRST, total_stages)
    }

    /// Assembles a state, restoring the invariants: stage 1 is added to the
    /// completed set, `current` is clamped into `[1, total]` and `next` is
    /// derived from it.
    pub fn from_parts(
        mut completed_stages: BTreeSet<StageId>,
        current: StageId,
        total_stages: u32,
    ) -> Self {
        let total_stages = total_stages.max(1);
        completed_stages.insert(StageId::FIRST);

        let current = current.get().clamp(1, total_stages);
        let next = (current + 1).min(total_stages);

        Self {
            completed_stages,
            current_stage: StageId::new(current).unwrap_or(StageId::FIRST),
            next_stage: StageId::new(next).unwrap_or(StageId::FIRST),
            total_stages,
        }
    }

    pub fn is_completed(&self, stage: StageId) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// The final stage has been reached.
    pub fn is_terminal(&self) -> bool {
        self.current_stage.get() == self.total_stages
    }

    /// Nothing beyond the baseline has been reached.
    pub fn is_baseline(&self) -> bool {
        self.current_stage == StageId::FIRST
    }

    /// Completed fraction of the stage set, in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        self.current_stage.get() as f64 / self.total_stages as f64
    }
}
