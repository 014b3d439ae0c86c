use actix_web::{
    http::StatusCode,
    test::{call_service, read_body_json, TestRequest},
};
use qr_payment_engine::traits::ProviderError;
use serde_json::{json, Value};

use super::{
    helpers::{prepare_test_db, test_service},
    mocks::StubProvider,
};

fn init_body(request_id: &str, amount: &str) -> Value {
    json!({
        "request_id": request_id,
        "amount": amount,
        "currency": "JPY",
        "tender": "PAYPAY",
        "terminal_id": 1
    })
}

#[actix_web::test]
async fn health_check() {
    let db = prepare_test_db().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::get().uri("/health").to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn init_payment_returns_a_pending_record_with_a_reference() {
    let db = prepare_test_db().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-init", "100.00")).to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = read_body_json(res).await;
    assert_eq!(body["request_id"], "e-init");
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["provider_reference"], "https://qr.example.com/e-init");
    assert_eq!(body["amount"], "100.00");
}

#[actix_web::test]
async fn duplicate_request_id_is_a_conflict() {
    let db = prepare_test_db().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-dup", "100.00")).to_request();
    assert_eq!(call_service(&service, req).await.status(), StatusCode::CREATED);
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-dup", "100.00")).to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = read_body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[actix_web::test]
async fn provider_rejection_is_a_bad_request() {
    let db = prepare_test_db().await;
    let provider = StubProvider::new();
    provider.fail_next_create(ProviderError::Rejected("amount below minimum".into()));
    let service = test_service!(db, provider);
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-reject", "0.00")).to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn provider_outage_is_a_bad_gateway() {
    let db = prepare_test_db().await;
    let provider = StubProvider::new();
    provider.fail_next_create(ProviderError::Unavailable("connection refused".into()));
    let service = test_service!(db, provider);
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-outage", "100.00")).to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn unknown_payment_is_not_found() {
    let db = prepare_test_db().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::get().uri("/payments/e-ghost").to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn a_dead_store_is_service_unavailable() {
    let db = prepare_test_db().await;
    db.pool().close().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::get().uri("/payments/e-any").to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = read_body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("store is unavailable"));
}

#[actix_web::test]
async fn cancel_is_terminal_and_hides_the_reference() {
    let db = prepare_test_db().await;
    let service = test_service!(db, StubProvider::new());
    let req = TestRequest::post().uri("/payments/init").set_json(init_body("e-cancel", "100.00")).to_request();
    assert_eq!(call_service(&service, req).await.status(), StatusCode::CREATED);

    let req = TestRequest::post().uri("/payments/e-cancel/cancel").to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = read_body_json(res).await;
    assert_eq!(body["status"], "CANCELLED");
    // A dead QR reference is withheld from clients.
    assert!(body.get("provider_reference").is_none());

    let req = TestRequest::post().uri("/payments/e-cancel/cancel").to_request();
    let res = call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
