//! Error types for onboard-progress crate.
//!
//! Evaluation itself is total and never returns these; they surface from
//! stage predicates (where the evaluator absorbs them), stage-set
//! construction, configuration loading and the watcher registry.

use onboard_gateway::GatewayError;
use onboard_types::StageId;
use thiserror::Error;

use crate::monitor::WatchKey;

/// Why a single stage predicate could not produce an answer.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// The backend request failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A facility-level check ran without a facility record or id.
    #[error("no facility in context for {0}")]
    MissingFacility(String),

    /// Application-defined predicate failure.
    #[error("predicate failed: {0}")]
    Failed(String),
}

impl PredicateError {
    /// The backend rejected the credentials, so no later stage can pass.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PredicateError::Gateway(e) if e.is_unauthorized())
    }

    /// Whether the next evaluation could plausibly answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, PredicateError::Gateway(e) if e.is_transient())
    }
}

/// Result type for predicate checks.
pub type PredicateResult<T> = Result<T, PredicateError>;

/// Errors from building stage sets, loading configuration and managing
/// watchers.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Stage set is empty, has gaps, or does not start with the baseline.
    #[error("invalid stage set: {0}")]
    InvalidStageSet(String),

    /// Stage id outside the stage set.
    #[error("unknown stage {0}")]
    UnknownStage(StageId),

    /// A watcher is already running for this key.
    #[error("watcher already running for {0}")]
    WatcherAlreadyRunning(WatchKey),

    /// No watcher registered for this key.
    #[error("no watcher for {0}")]
    WatcherNotFound(WatchKey),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Gateway construction failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result type for progress operations.
pub type ProgressResult<T> = Result<T, ProgressError>;
