//! In-memory gateway shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use onboard_gateway::{
    AgreementData, CommercialUser, CommercialUserData, FinancialInfoData, GatewayError,
    GatewayResult, MeterEntry, MeterGroup, Referral, ReferralData, ResourceGateway,
};
use onboard_types::{AuthContext, FacilityId, FacilityKind, FacilityRecord};
use serde_json::{json, Value};

/// Backend records the fake serves.
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub commercial_user: Option<CommercialUser>,
    pub referral: Option<Referral>,
    pub terms_accepted: Option<bool>,
    pub financial_info: Option<Value>,
    pub meters: Vec<MeterEntry>,
    pub facility: Option<FacilityRecord>,
}

/// Scriptable [`ResourceGateway`] that counts every call.
#[derive(Default)]
pub struct FakeGateway {
    records: Mutex<Records>,
    failing: Mutex<HashSet<&'static str>>,
    delay: Mutex<Option<Duration>>,
    token_rejected: AtomicBool,
    calls: AtomicUsize,
    facility_fetches: AtomicUsize,
}

impl FakeGateway {
    pub fn new(records: Records) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn facility_fetches(&self) -> usize {
        self.facility_fetches.load(Ordering::SeqCst)
    }

    /// Make one endpoint answer with a 500.
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    /// Answer every request with a 401, as for an expired token.
    pub fn reject_token(&self) {
        self.token_rejected.store(true, Ordering::SeqCst);
    }

    /// Delay every response.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn update(&self, f: impl FnOnce(&mut Records)) {
        f(&mut self.records.lock().unwrap());
    }

    async fn respond<T>(
        &self,
        endpoint: &'static str,
        f: impl FnOnce(&Records) -> T,
    ) -> GatewayResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.token_rejected.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 401,
                message: "jwt expired".into(),
            });
        }

        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(GatewayError::Status {
                status: 500,
                message: format!("{} unavailable", endpoint),
            });
        }

        let records = self.records.lock().unwrap();
        Ok(f(&records))
    }
}

#[async_trait]
impl ResourceGateway for FakeGateway {
    async fn commercial_user(&self, _: &AuthContext) -> GatewayResult<CommercialUserData> {
        self.respond("commercial_user", |r| CommercialUserData {
            commercial_user: r.commercial_user.clone(),
        })
        .await
    }

    async fn referral(&self, _: &AuthContext) -> GatewayResult<ReferralData> {
        self.respond("referral", |r| ReferralData {
            referral: r.referral.clone(),
        })
        .await
    }

    async fn agreement(&self, _: &AuthContext) -> GatewayResult<AgreementData> {
        self.respond("agreement", |r| AgreementData {
            terms_accepted: r.terms_accepted,
            signature: None,
        })
        .await
    }

    async fn financial_info(&self, _: &AuthContext) -> GatewayResult<FinancialInfoData> {
        self.respond("financial_info", |r| FinancialInfoData {
            financial_info: r.financial_info.clone(),
        })
        .await
    }

    async fn user_meters(&self, _: &AuthContext) -> GatewayResult<Vec<MeterEntry>> {
        self.respond("user_meters", |r| r.meters.clone()).await
    }

    async fn facility(
        &self,
        _: &AuthContext,
        _: FacilityKind,
        facility_id: &FacilityId,
    ) -> GatewayResult<FacilityRecord> {
        self.facility_fetches.fetch_add(1, Ordering::SeqCst);
        let missing = facility_id.as_str().to_string();
        self.respond("facility", |r| r.facility.clone())
            .await?
            .ok_or(GatewayError::MissingData(missing))
    }
}

pub fn auth() -> AuthContext {
    AuthContext::new("user-1", "token-abc")
}

pub fn registered_operator() -> CommercialUser {
    CommercialUser {
        owner_full_name: Some("Ada Operator".into()),
        owner_address: Some("1 Solar Way".into()),
        company_name: Some("Sunny LLC".into()),
        entity_type: Some("llc".into()),
    }
}

pub fn referral() -> Referral {
    Referral {
        inviter_id: Some("inviter-7".into()),
        status: Some("ACCEPTED".into()),
    }
}

pub fn meter_entry() -> MeterEntry {
    MeterEntry {
        meters: Some(MeterGroup {
            meters: Some(vec![json!({ "uid": "m-1" })]),
        }),
    }
}

/// Every operator stage done.
pub fn complete_operator() -> Records {
    Records {
        commercial_user: Some(registered_operator()),
        referral: Some(referral()),
        terms_accepted: Some(true),
        ..Default::default()
    }
}

/// Residential facility with every required detail and a verified status.
pub fn complete_residential_facility() -> FacilityRecord {
    FacilityRecord::from_value(json!({
        "id": "res-1",
        "status": "Verified",
        "commercialOperationDate": "2023-04-01",
        "interconnectedUtilityId": "UT-9",
        "eiaPlantId": "EIA-22",
        "energyStorageCapacity": 0,
        "hasOnSiteLoad": false,
        "hasNetMetering": true,
        "wregisEligibilityDate": "2023-05-01",
        "wregisId": "W-100",
        "rpsId": "RPS-3",
    }))
}

/// Commercial facility whose paperwork is fully approved but not yet verified.
pub fn approved_commercial_facility() -> FacilityRecord {
    let mut record = FacilityRecord::from_value(json!({ "id": "com-1", "status": "PENDING" }));
    for field in onboard_progress::checks::DOCUMENT_STATUS_FIELDS {
        record.set(field, json!("APPROVED"));
    }
    record
}
