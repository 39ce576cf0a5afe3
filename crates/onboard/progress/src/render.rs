//! Progress bar description.
//!
//! Maps a [`ProgressState`] and its stage set onto a row of segments. The
//! result describes what to draw; drawing itself belongs to the front end.

use std::fmt;

use onboard_types::{ProgressState, StageId};
use serde::{Deserialize, Serialize};

use crate::stage::{Remediation, StageSet};

/// Visual state of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentState {
    /// At or before the current stage.
    Completed,
    /// The stage to act on next, drawn outlined.
    Next,
    /// Not reachable yet, drawn muted.
    Future,
}

/// One stage in the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub stage: StageId,
    pub label: String,
    pub state: SegmentState,
    /// Stages past `next_stage` ignore clicks.
    pub clickable: bool,
    pub hovered: bool,
}

/// Render description of a whole progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub segments: Vec<Segment>,
    /// Label of the hovered stage, if any.
    pub tooltip: Option<String>,
    pub current_stage: StageId,
    pub total_stages: u32,
}

impl ProgressBar {
    pub fn segment(&self, stage: StageId) -> Option<&Segment> {
        self.segments.get(stage.index())
    }

    /// Label of the current stage.
    pub fn current_label(&self) -> Option<&str> {
        self.segment(self.current_stage).map(|s| s.label.as_str())
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for segment in &self.segments {
            let glyph = match segment.state {
                SegmentState::Completed => '#',
                SegmentState::Next => 'o',
                SegmentState::Future => '.',
            };
            write!(f, "{}", glyph)?;
        }
        write!(f, "] {}/{}", self.current_stage, self.total_stages)?;
        if let Some(label) = self.current_label() {
            write!(f, " {}", label)?;
        }
        Ok(())
    }
}

/// Build the bar for a state.
pub fn render(state: &ProgressState, stage_set: &StageSet, hover: Option<StageId>) -> ProgressBar {
    let segments: Vec<Segment> = stage_set
        .iter()
        .map(|stage| {
            let segment_state = if stage.id <= state.current_stage {
                SegmentState::Completed
            } else if stage.id == state.next_stage {
                SegmentState::Next
            } else {
                SegmentState::Future
            };

            Segment {
                stage: stage.id,
                label: stage.label.clone(),
                state: segment_state,
                clickable: stage.id <= state.next_stage,
                hovered: hover == Some(stage.id),
            }
        })
        .collect();

    let tooltip = hover
        .and_then(|id| stage_set.get(id))
        .map(|stage| stage.label.clone());

    ProgressBar {
        segments,
        tooltip,
        current_stage: state.current_stage,
        total_stages: stage_set.total(),
    }
}

/// What a click on a stage marker should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ClickOutcome {
    Ignored,
    /// Open the modal that completes this stage.
    Remediate {
        stage: StageId,
        remediation: Remediation,
    },
}

/// Resolve a click on a stage marker.
///
/// Only the actionable stage (`next_stage`, while not yet reached) opens
/// anything; unreachable and already-completed stages are no-ops.
pub fn click(state: &ProgressState, stage_set: &StageSet, stage: StageId) -> ClickOutcome {
    if stage != state.next_stage || stage <= state.current_stage {
        return ClickOutcome::Ignored;
    }

    match stage_set.get(stage) {
        Some(definition) if definition.remediation != Remediation::None => {
            ClickOutcome::Remediate {
                stage,
                remediation: definition.remediation,
            }
        }
        _ => ClickOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{FnPredicate, StagePredicate};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn stage(id: u32) -> StageId {
        StageId::new(id).unwrap()
    }

    fn noop() -> Arc<dyn StagePredicate> {
        Arc::new(FnPredicate::new("noop", |_, _| async { Ok(false) }))
    }

    fn operator_like() -> StageSet {
        StageSet::builder("Account created")
            .stage("Registration", noop(), Remediation::CommercialRegistration)
            .stage("Referral", noop(), Remediation::ReferralInvite)
            .stage("Terms", noop(), Remediation::TermsAgreement)
            .build()
    }

    fn state(current: u32, total: u32) -> ProgressState {
        let completed = (1..=current).filter_map(StageId::new).collect::<BTreeSet<_>>();
        ProgressState::from_parts(completed, stage(current), total)
    }

    #[test]
    fn test_segment_states() {
        let bar = render(&state(2, 4), &operator_like(), None);
        let states: Vec<SegmentState> = bar.segments.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                SegmentState::Completed,
                SegmentState::Completed,
                SegmentState::Next,
                SegmentState::Future
            ]
        );
        let clickable: Vec<bool> = bar.segments.iter().map(|s| s.clickable).collect();
        assert_eq!(clickable, vec![true, true, true, false]);
        assert!(bar.tooltip.is_none());
    }

    #[test]
    fn test_terminal_bar_is_all_completed() {
        let bar = render(&state(4, 4), &operator_like(), None);
        assert!(bar
            .segments
            .iter()
            .all(|s| s.state == SegmentState::Completed));
        assert_eq!(bar.to_string(), "[####] 4/4 Terms");
    }

    #[test]
    fn test_hover_tooltip() {
        let bar = render(&state(1, 4), &operator_like(), Some(stage(3)));
        assert_eq!(bar.tooltip.as_deref(), Some("Referral"));
        assert!(bar.segment(stage(3)).unwrap().hovered);
        assert!(!bar.segment(stage(2)).unwrap().hovered);
        assert_eq!(bar.to_string(), "[#o..] 1/4 Account created");
    }

    #[test]
    fn test_click_unreachable_is_noop() {
        assert_eq!(
            click(&state(1, 4), &operator_like(), stage(3)),
            ClickOutcome::Ignored
        );
    }

    #[test]
    fn test_click_actionable_stage_remediates() {
        assert_eq!(
            click(&state(1, 4), &operator_like(), stage(2)),
            ClickOutcome::Remediate {
                stage: stage(2),
                remediation: Remediation::CommercialRegistration
            }
        );
    }

    #[test]
    fn test_click_completed_or_terminal_is_noop() {
        assert_eq!(
            click(&state(3, 4), &operator_like(), stage(2)),
            ClickOutcome::Ignored
        );
        assert_eq!(
            click(&state(4, 4), &operator_like(), stage(4)),
            ClickOutcome::Ignored
        );
    }
}
