//! # Onboard Gateway - Remote Resource Gateway client
//!
//! Thin, read-only client for the REST backend that records each onboarding
//! milestone (commercial profile, referral, agreement, financial info,
//! meters, facilities). Every request is a bearer-authenticated `GET` whose
//! response is wrapped in a `{status, data}` envelope.
//!
//! The [`ResourceGateway`] trait is the seam stage predicates are written
//! against; [`HttpGateway`] is the production implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use onboard_gateway::{GatewayConfig, HttpGateway, ResourceGateway};
//! use onboard_types::AuthContext;
//!
//! # async fn example() -> onboard_gateway::GatewayResult<()> {
//! let gateway = HttpGateway::new(&GatewayConfig::default())?;
//! let auth = AuthContext::new("user-123", "token");
//!
//! let agreement = gateway.agreement(&auth).await?;
//! println!("terms accepted: {:?}", agreement.terms_accepted);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::{paths, HttpGateway, ResourceGateway};
pub use config::{GatewayConfig, DEFAULT_BASE_URL};
pub use error::{GatewayError, GatewayResult};
pub use wire::{
    AgreementData, CommercialUser, CommercialUserData, Envelope, FinancialInfoData, MeterEntry,
    MeterGroup, Referral, ReferralData,
};
