//! Onboard Types - Core types for onboarding progress evaluation
//!
//! Operator, commercial-facility and residential-facility dashboards all
//! track a customer's progress through an ordered list of onboarding stages
//! (profile registered, terms accepted, meters authorized, ...). This crate
//! holds the types shared by the gateway client, the evaluator and the CLI.
//!
//! ## Key Concepts
//!
//! - **AuthContext**: explicit user id + bearer token, passed into every evaluation
//! - **ResourceContext**: the facility a facility-level view is looking at
//! - **StageId**: 1-based, dense stage identifier
//! - **ProgressState**: derived, never persisted, recomputed on every mount/poll
//! - **DashboardVariant**: which stage table a view uses

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod auth;
pub mod facility;
pub mod ids;
pub mod progress;
pub mod variant;

// Re-export main types
pub use auth::AuthContext;
pub use facility::{FacilityKind, FacilityRecord, ResourceContext};
pub use ids::{FacilityId, StageId, UserId};
pub use progress::ProgressState;
pub use variant::{DashboardVariant, ParseVariantError};
