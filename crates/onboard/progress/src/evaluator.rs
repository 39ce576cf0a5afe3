//! Generic onboarding progress evaluator.
//!
//! Runs a stage set's predicates and folds the answers into a
//! [`ProgressState`]. Evaluation is total: failing requests, malformed
//! payloads, timeouts and panicking predicates all read as "stage not done",
//! and the caller always gets a state back. Missing credentials, or a
//! backend that rejects them, end the scan at the baseline stage.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use onboard_types::{AuthContext, ProgressState, ResourceContext, StageId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::EvaluationConfig;
use crate::predicates::StagePredicate;
use crate::stage::{StageCheck, StageDefinition, StageSet};

/// How `current_stage` is derived from the stages whose predicates passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Highest stage such that it and every stage before it passed.
    #[default]
    Contiguous,
    /// Highest stage that passed, ignoring gaps before it.
    HighestTrue,
}

impl CompletionPolicy {
    /// Current stage for a set of passed stages out of `total`.
    pub fn current_stage(self, passed: &BTreeSet<StageId>, total: u32) -> StageId {
        let reached = match self {
            CompletionPolicy::Contiguous => {
                let mut current = StageId::FIRST;
                while current.get() < total && passed.contains(&current.succ()) {
                    current = current.succ();
                }
                current
            }
            CompletionPolicy::HighestTrue => passed
                .iter()
                .copied()
                .filter(|id| id.get() <= total)
                .max()
                .unwrap_or(StageId::FIRST),
        };
        reached.max(StageId::FIRST)
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionPolicy::Contiguous => write!(f, "contiguous"),
            CompletionPolicy::HighestTrue => write!(f, "highest-true"),
        }
    }
}

impl FromStr for CompletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contiguous" => Ok(CompletionPolicy::Contiguous),
            "highest-true" | "highest_true" | "max" => Ok(CompletionPolicy::HighestTrue),
            other => Err(format!("unknown completion policy: {}", other)),
        }
    }
}

/// How predicates are scheduled within one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// One at a time, in stage order. Latency is the sum of the checks.
    #[default]
    Sequential,
    /// All at once. Latency is the slowest check.
    Concurrent,
}

/// Result of running one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: StageId,
    pub label: String,
    pub passed: bool,
    /// Why the predicate could not answer, when it failed closed.
    pub failure: Option<String>,
    pub latency_ms: u64,
}

/// A progress state together with the per-stage outcomes behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub state: ProgressState,
    /// Empty when credentials were missing. When the backend rejected them,
    /// ends at the stage whose request was refused.
    pub outcomes: Vec<StageOutcome>,
}

impl Evaluation {
    /// Outcomes whose predicate failed closed.
    pub fn failures(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|o| o.failure.is_some())
    }
}

/// Evaluates stage sets under one [`EvaluationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Progress for one user or facility.
    pub async fn evaluate(
        &self,
        stage_set: &StageSet,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> ProgressState {
        self.evaluate_detailed(stage_set, auth, resources).await.state
    }

    /// Progress plus the outcome of every stage.
    #[instrument(skip_all, fields(user_id = %auth.user_id, stages = stage_set.len(), policy = %self.config.policy))]
    pub async fn evaluate_detailed(
        &self,
        stage_set: &StageSet,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> Evaluation {
        let total = stage_set.total();

        if !auth.is_complete() {
            debug!("Missing credentials, returning baseline progress");
            return Evaluation {
                state: ProgressState::baseline(total),
                outcomes: Vec::new(),
            };
        }

        let mut outcomes = Vec::with_capacity(stage_set.len());
        let mut rejected = false;

        match self.config.mode {
            ExecutionMode::Sequential => {
                for stage in stage_set.iter() {
                    let (outcome, verdict) = self.run_stage(stage, auth, resources).await;
                    outcomes.push(outcome);
                    if verdict == Verdict::Rejected {
                        rejected = true;
                        break;
                    }
                }
            }
            ExecutionMode::Concurrent => {
                let results = join_all(
                    stage_set
                        .iter()
                        .map(|stage| self.run_stage(stage, auth, resources)),
                )
                .await;
                for (outcome, verdict) in results {
                    outcomes.push(outcome);
                    if verdict == Verdict::Rejected {
                        rejected = true;
                        break;
                    }
                }
            }
        }

        if rejected {
            warn!("Credentials rejected by the backend, returning baseline progress");
            return Evaluation {
                state: ProgressState::baseline(total),
                outcomes,
            };
        }

        let passed: BTreeSet<StageId> = outcomes
            .iter()
            .filter(|o| o.passed)
            .map(|o| o.stage)
            .collect();
        let current = self.config.policy.current_stage(&passed, total);
        let state = ProgressState::from_parts(passed, current, total);

        debug!(
            current_stage = %state.current_stage,
            next_stage = %state.next_stage,
            completed = state.completed_stages.len(),
            "Evaluated onboarding progress"
        );

        Evaluation { state, outcomes }
    }

    /// Whether a single predicate holds, failing closed like a stage would.
    pub async fn check(
        &self,
        predicate: &dyn StagePredicate,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> bool {
        if !auth.is_complete() {
            return false;
        }
        let (verdict, _) = self.run_predicate(predicate, auth, resources).await;
        verdict == Verdict::Passed
    }

    async fn run_stage(
        &self,
        stage: &StageDefinition,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> (StageOutcome, Verdict) {
        let start = Instant::now();

        let (verdict, failure) = match &stage.check {
            StageCheck::Baseline => (Verdict::Passed, None),
            StageCheck::Predicate(predicate) => {
                self.run_predicate(predicate.as_ref(), auth, resources).await
            }
        };

        let outcome = StageOutcome {
            stage: stage.id,
            label: stage.label.clone(),
            passed: verdict == Verdict::Passed,
            failure,
            latency_ms: millis(start.elapsed()),
        };
        (outcome, verdict)
    }

    async fn run_predicate(
        &self,
        predicate: &dyn StagePredicate,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> (Verdict, Option<String>) {
        let timeout = self.config.predicate_timeout();
        let check = AssertUnwindSafe(predicate.check(auth, resources)).catch_unwind();

        match tokio::time::timeout(timeout, check).await {
            Ok(Ok(Ok(passed))) => {
                debug!(predicate = predicate.name(), passed, "Predicate evaluated");
                let verdict = if passed { Verdict::Passed } else { Verdict::Failed };
                (verdict, None)
            }
            Ok(Ok(Err(e))) if e.is_unauthorized() => {
                warn!(predicate = predicate.name(), error = %e, "Credentials rejected");
                (Verdict::Rejected, Some(e.to_string()))
            }
            Ok(Ok(Err(e))) => {
                warn!(
                    predicate = predicate.name(),
                    error = %e,
                    transient = e.is_transient(),
                    "Predicate failed, treating as incomplete"
                );
                (Verdict::Failed, Some(e.to_string()))
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                warn!(predicate = predicate.name(), panic = %message, "Predicate panicked, treating as incomplete");
                (Verdict::Failed, Some(format!("panicked: {}", message)))
            }
            Err(_) => {
                let timeout_ms = millis(timeout);
                warn!(
                    predicate = predicate.name(),
                    timeout_ms,
                    "Predicate timed out, treating as incomplete"
                );
                (
                    Verdict::Failed,
                    Some(format!("timed out after {}ms", timeout_ms)),
                )
            }
        }
    }
}

/// How one predicate answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Passed,
    Failed,
    /// The backend rejected the credentials; the whole evaluation is void.
    Rejected,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Evaluate with the default configuration.
pub async fn evaluate(
    stage_set: &StageSet,
    auth: &AuthContext,
    resources: &ResourceContext,
) -> ProgressState {
    Evaluator::default().evaluate(stage_set, auth, resources).await
}
