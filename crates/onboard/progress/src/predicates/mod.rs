//! Stage predicates.
//!
//! A predicate answers "is this stage done?" for one user or facility:
//! - Account predicates query the user's records on the gateway
//! - Facility predicates inspect the facility record, fetching it only when
//!   the view has not already loaded it
//!
//! Predicates report failures as errors; the evaluator is the one place that
//! turns an error into "not done".

mod account;
mod facility;

pub use account::{
    CommercialProfilePredicate, FinancialInfoPredicate, MetersAuthorizedPredicate, ProfileField,
    ReferralPredicate, TermsAcceptedPredicate,
};
pub use facility::{FacilityCheck, FacilityPredicate};

use std::future::Future;

use async_trait::async_trait;
use onboard_types::{AuthContext, ResourceContext};

use crate::error::PredicateResult;

/// Asynchronous completion check for one stage.
#[async_trait]
pub trait StagePredicate: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Whether the stage is complete.
    async fn check(&self, auth: &AuthContext, resources: &ResourceContext)
        -> PredicateResult<bool>;
}

/// Predicate backed by a closure.
///
/// Handy for application-specific stages and for tests.
pub struct FnPredicate<F> {
    name: String,
    check_fn: F,
}

impl<F> FnPredicate<F> {
    pub fn new<Fut>(name: impl Into<String>, check_fn: F) -> Self
    where
        F: Fn(AuthContext, ResourceContext) -> Fut,
        Fut: Future<Output = PredicateResult<bool>>,
    {
        Self {
            name: name.into(),
            check_fn,
        }
    }
}

#[async_trait]
impl<F, Fut> StagePredicate for FnPredicate<F>
where
    F: Fn(AuthContext, ResourceContext) -> Fut + Send + Sync,
    Fut: Future<Output = PredicateResult<bool>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(
        &self,
        auth: &AuthContext,
        resources: &ResourceContext,
    ) -> PredicateResult<bool> {
        (self.check_fn)(auth.clone(), resources.clone()).await
    }
}
