//! HttpGateway against a mock backend.

use onboard_gateway::{GatewayConfig, GatewayError, HttpGateway, ResourceGateway};
use onboard_types::{AuthContext, FacilityId, FacilityKind};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth() -> AuthContext {
    AuthContext::new("u-1", "tok-123")
}

async fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&GatewayConfig::with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_agreement_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/agreement/u-1"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "termsAccepted": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agreement = gateway(&server).await.agreement(&auth()).await.unwrap();
    assert_eq!(agreement.terms_accepted, Some(true));
}

#[tokio::test]
async fn test_commercial_user_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/get-commercial-user/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "commercialUser": { "ownerFullName": "Grace Hopper", "ownerAddress": "1 Main St" } }
        })))
        .mount(&server)
        .await;

    let data = gateway(&server).await.commercial_user(&auth()).await.unwrap();
    let user = data.commercial_user.unwrap();
    assert_eq!(user.owner_full_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(user.owner_address.as_deref(), Some("1 Main St"));
}

#[tokio::test]
async fn test_user_meters_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/user-meters/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [
                { "meters": { "meters": [] } },
                { "meters": { "meters": [{ "uid": "m-1" }] } }
            ]
        })))
        .mount(&server)
        .await;

    let entries = gateway(&server).await.user_meters(&auth()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.has_meters()));
}

#[tokio::test]
async fn test_facility_record_by_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/residential-facility/get-one-facility/f-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "id": "f-9", "status": "Verified", "hasOnSiteLoad": false }
        })))
        .mount(&server)
        .await;

    let record = gateway(&server)
        .await
        .facility(&auth(), FacilityKind::Residential, &FacilityId::new("f-9"))
        .await
        .unwrap();
    assert_eq!(record.status(), Some("Verified"));
    assert_eq!(record.field("hasOnSiteLoad"), Some(&json!(false)));
}

#[tokio::test]
async fn test_non_success_envelope_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/financial-info/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "no financial info"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server).await.financial_info(&auth()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Envelope { ref status, .. } if status == "error"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/referral/by-user-id/u-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let err = gateway(&server).await.referral(&auth()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("token expired"));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/agreement/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).await.agreement(&auth()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn test_success_without_data_is_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/agreement/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;

    let err = gateway(&server).await.agreement(&auth()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingData(_)));
}
