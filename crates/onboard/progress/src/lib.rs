//! # Onboard Progress - Onboarding Progress Evaluation
//!
//! Computes how far a user (or one of their facilities) has moved through
//! a dashboard's onboarding flow, and describes the progress bar that shows it.
//!
//! ## Overview
//!
//! Every dashboard variant declares an ordered [`StageSet`]. Stage 1 is
//! always "account created" and holds by construction; each later stage is
//! guarded by a [`StagePredicate`] that reads the Remote Resource Gateway.
//! One generic [`Evaluator`] folds the predicate answers into a
//! [`ProgressState`](onboard_types::ProgressState), so the operator,
//! commercial and residential dashboards differ only in their tables.
//!
//! ## Key Components
//!
//! - [`StageSet`]: ordered, validated stage table
//! - [`Evaluator`]: runs predicates and applies a [`CompletionPolicy`]
//! - [`render`] / [`click`]: progress bar description and click handling
//! - [`ProgressWatcher`]: polls one view and re-evaluates on refresh
//! - [`ProgressMonitor`]: one watcher per mounted view
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use onboard_gateway::{GatewayConfig, HttpGateway};
//! use onboard_progress::{render, Evaluator, StageSet};
//! use onboard_types::{AuthContext, DashboardVariant, ResourceContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(HttpGateway::new(&GatewayConfig::default())?);
//! let stages = StageSet::for_variant(DashboardVariant::Operator, gateway);
//!
//! let auth = AuthContext::new("user-123", "token");
//! let state = Evaluator::default()
//!     .evaluate(&stages, &auth, &ResourceContext::none())
//!     .await;
//!
//! println!("{}", render(&state, &stages, None));
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Semantics
//!
//! Evaluation never fails. Missing credentials short-circuit to the
//! baseline state without touching the network, and a predicate that
//! errors or times out counts as "not completed".

pub mod checks;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod monitor;
pub mod predicates;
pub mod render;
pub mod stage;
pub mod tables;
pub mod watcher;

pub use config::{EvaluationConfig, LoggingConfig, PollingConfig, ProgressConfig};
pub use error::{PredicateError, PredicateResult, ProgressError, ProgressResult};
pub use evaluator::{
    evaluate, CompletionPolicy, Evaluation, Evaluator, ExecutionMode, StageOutcome,
};
pub use monitor::{ProgressMonitor, WatchKey};
pub use predicates::{FnPredicate, StagePredicate};
pub use render::{click, render, ClickOutcome, ProgressBar, Segment, SegmentState};
pub use stage::{Remediation, StageCheck, StageDefinition, StageSet, StageSetBuilder};
pub use tables::{evaluate_gate, ActionGate};
pub use watcher::{ProgressEvent, ProgressSnapshot, ProgressWatcher, Trigger};
