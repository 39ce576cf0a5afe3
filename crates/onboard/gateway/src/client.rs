//! HTTP client for the Remote Resource Gateway

use async_trait::async_trait;
use onboard_types::{AuthContext, FacilityId, FacilityKind, FacilityRecord};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::wire::{
    AgreementData, CommercialUserData, Envelope, FinancialInfoData, MeterEntry, ReferralData,
};

/// Read-only access to the per-resource completion data stage checks need.
///
/// Implemented over HTTP by [`HttpGateway`]; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// `GET /user/get-commercial-user/{userId}`
    async fn commercial_user(&self, auth: &AuthContext) -> GatewayResult<CommercialUserData>;

    /// `GET /user/referral/by-user-id/{userId}`
    async fn referral(&self, auth: &AuthContext) -> GatewayResult<ReferralData>;

    /// `GET /user/agreement/{userId}`
    async fn agreement(&self, auth: &AuthContext) -> GatewayResult<AgreementData>;

    /// `GET /user/financial-info/{userId}`
    async fn financial_info(&self, auth: &AuthContext) -> GatewayResult<FinancialInfoData>;

    /// `GET /auth/user-meters/{userId}`
    async fn user_meters(&self, auth: &AuthContext) -> GatewayResult<Vec<MeterEntry>>;

    /// Facility record by id.
    async fn facility(
        &self,
        auth: &AuthContext,
        kind: FacilityKind,
        facility_id: &FacilityId,
    ) -> GatewayResult<FacilityRecord>;
}

/// Endpoint paths, relative to the base URL.
pub mod paths {
    use onboard_types::{FacilityId, FacilityKind, UserId};

    pub fn commercial_user(user_id: &UserId) -> String {
        format!("/user/get-commercial-user/{}", user_id.as_str())
    }

    pub fn referral(user_id: &UserId) -> String {
        format!("/user/referral/by-user-id/{}", user_id.as_str())
    }

    pub fn agreement(user_id: &UserId) -> String {
        format!("/user/agreement/{}", user_id.as_str())
    }

    pub fn financial_info(user_id: &UserId) -> String {
        format!("/user/financial-info/{}", user_id.as_str())
    }

    pub fn user_meters(user_id: &UserId) -> String {
        format!("/auth/user-meters/{}", user_id.as_str())
    }

    pub fn facility(kind: FacilityKind, facility_id: &FacilityId) -> String {
        match kind {
            FacilityKind::Commercial => {
                format!("/facility/get-one-facility/{}", facility_id.as_str())
            }
            FacilityKind::Residential => format!(
                "/residential-facility/get-one-facility/{}",
                facility_id.as_str()
            ),
        }
    }
}

/// reqwest-backed [`ResourceGateway`].
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway client
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        // Validate up front so a bad base URL fails at startup, not per stage.
        url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========== Internal HTTP helpers ==========

    #[instrument(skip(self, auth), fields(user_id = %auth.user_id))]
    async fn get<T: DeserializeOwned>(&self, auth: &AuthContext, path: &str) -> GatewayResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&auth.auth_token)
            .send()
            .await?;
        self.handle_response(path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> GatewayResult<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(path, status = status.as_u16(), "Gateway returned error status");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: if status == StatusCode::NOT_FOUND && message.is_empty() {
                    "Resource not found".to_string()
                } else {
                    message
                },
            });
        }

        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;

        if !envelope.is_success() {
            return Err(GatewayError::Envelope {
                status: envelope.status,
                message: envelope.message.unwrap_or_default(),
            });
        }

        envelope
            .data
            .ok_or_else(|| GatewayError::MissingData(path.to_string()))
    }
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn commercial_user(&self, auth: &AuthContext) -> GatewayResult<CommercialUserData> {
        self.get(auth, &paths::commercial_user(&auth.user_id)).await
    }

    async fn referral(&self, auth: &AuthContext) -> GatewayResult<ReferralData> {
        self.get(auth, &paths::referral(&auth.user_id)).await
    }

    async fn agreement(&self, auth: &AuthContext) -> GatewayResult<AgreementData> {
        self.get(auth, &paths::agreement(&auth.user_id)).await
    }

    async fn financial_info(&self, auth: &AuthContext) -> GatewayResult<FinancialInfoData> {
        self.get(auth, &paths::financial_info(&auth.user_id)).await
    }

    async fn user_meters(&self, auth: &AuthContext) -> GatewayResult<Vec<MeterEntry>> {
        self.get(auth, &paths::user_meters(&auth.user_id)).await
    }

    async fn facility(
        &self,
        auth: &AuthContext,
        kind: FacilityKind,
        facility_id: &FacilityId,
    ) -> GatewayResult<FacilityRecord> {
        let value: Value = self.get(auth, &paths::facility(kind, facility_id)).await?;
        Ok(FacilityRecord::from_value(value))
    }
}
