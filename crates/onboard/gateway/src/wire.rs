//! Wire types for the Remote Resource Gateway.
//!
//! Every response is wrapped in `{status, data, message?}`. Payload fields are
//! optional throughout: the backend omits what it has not recorded yet, and a
//! missing field must read as "not done" rather than fail the decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status string the backend uses for successful responses.
pub const SUCCESS_STATUS: &str = "success";

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(SUCCESS_STATUS)
    }
}

/// `data` of `GET /user/get-commercial-user/{userId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialUserData {
    #[serde(default)]
    pub commercial_user: Option<CommercialUser>,
}

/// Commercial profile of an operator or facility owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialUser {
    #[serde(default)]
    pub owner_full_name: Option<String>,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
}

/// `data` of `GET /user/referral/by-user-id/{userId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralData {
    #[serde(default)]
    pub referral: Option<Referral>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    #[serde(default)]
    pub inviter_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `data` of `GET /user/agreement/{userId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementData {
    #[serde(default)]
    pub terms_accepted: Option<bool>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// `data` of `GET /user/financial-info/{userId}`.
///
/// The financial record itself is opaque here; only its presence matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInfoData {
    #[serde(default)]
    pub financial_info: Option<Value>,
}

/// One element of `GET /auth/user-meters/{userId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterEntry {
    #[serde(default)]
    pub meters: Option<MeterGroup>,
}

/// Nested `meters` object of a [`MeterEntry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterGroup {
    #[serde(default)]
    pub meters: Option<Vec<Value>>,
}

impl MeterEntry {
    /// Entry carries at least one authorized meter.
    pub fn has_meters(&self) -> bool {
        self.meters
            .as_ref()
            .and_then(|group| group.meters.as_ref())
            .map(|meters| !meters.is_empty())
            .unwrap_or(false)
    }
}
