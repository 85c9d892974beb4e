use std::collections::HashMap;

use actix_web::{test, web, App};
use httpmock::prelude::*;
use serde_json::json;

use paystack_relay_server::{AppState, RelayConfig};

const SECRET: &str = "sk_test_relay";

/// Build an AppState pointed at a mock Paystack, with optional overrides.
fn make_state(base_url: &str, overrides: &[(&str, &str)]) -> web::Data<AppState> {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("PAYSTACK_SECRET_KEY".into(), SECRET.into());
    vars.insert("PAYSTACK_BASE_URL".into(), base_url.into());
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    let config = RelayConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
    web::Data::new(AppState::new(config).unwrap())
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .configure(paystack_relay_server::configure),
        )
        .await
    };
}

fn init_success(data: serde_json::Value) -> serde_json::Value {
    json!({"status": true, "message": "Authorization URL created", "data": data})
}

#[actix_rt::test]
async fn test_index_returns_welcome_text() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(
        body,
        "Welcome to the Paystack payment initialization API".as_bytes()
    );
}

#[actix_rt::test]
async fn test_health_reports_ok() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "paystack-relay");
}

#[actix_rt::test]
async fn test_initialize_without_subaccount_omits_split() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transaction/initialize")
                .header("Authorization", format!("Bearer {SECRET}"))
                .json_body(json!({"email": "buyer@example.com", "amount": 5000}));
            then.status(200).json_body(init_success(json!({
                "authorization_url": "https://checkout.paystack.com/abc",
                "access_code": "ac_abc",
                "reference": "ref_abc"
            })));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"email": "buyer@example.com", "amount": 5000}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"reference": "ref_abc"}));
    mock.assert_async().await;
}

#[actix_rt::test]
async fn test_initialize_with_subaccount_attaches_split() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transaction/initialize")
                .json_body(json!({
                    "email": "buyer@example.com",
                    "amount": 5000,
                    "split": {
                        "type": "percentage",
                        "subaccounts": [{"subaccount": "ACCT_1", "share": 50}]
                    }
                }));
            then.status(200)
                .json_body(init_success(json!({"reference": "ref_split"})));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({
            "email": "buyer@example.com",
            "amount": 5000,
            "subaccountCode": "ACCT_1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["reference"], "ref_split");
    mock.assert_async().await;
}

#[actix_rt::test]
async fn test_initialize_access_code_and_major_units() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transaction/initialize")
                .json_body(json!({"email": "buyer@example.com", "amount": 5000}));
            then.status(200).json_body(init_success(json!({
                "access_code": "ac_abc",
                "reference": "ref_abc"
            })));
        })
        .await;

    let state = make_state(
        &server.base_url(),
        &[("INIT_RESPONSE_FIELD", "access_code"), ("AMOUNT_UNIT", "major")],
    );
    let app = init_app!(state);
    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"email": "buyer@example.com", "amount": 50}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"access_code": "ac_abc"}));
    mock.assert_async().await;
}

#[actix_rt::test]
async fn test_initialize_unauthorized_upstream_is_500() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/transaction/initialize");
            then.status(401)
                .json_body(json!({"status": false, "message": "Invalid key"}));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"email": "buyer@example.com", "amount": 5000}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Payment initialization failed"}));
    mock.assert_hits_async(1).await;
}

#[actix_rt::test]
async fn test_initialize_missing_reference_is_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/transaction/initialize");
            then.status(200)
                .json_body(init_success(json!({"access_code": "ac_abc"})));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"email": "buyer@example.com", "amount": 5000}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Payment initialization failed");
}

#[actix_rt::test]
async fn test_initialize_validation_errors_are_400_without_upstream_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/transaction/initialize");
            then.status(200)
                .json_body(init_success(json!({"reference": "ref_abc"})));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));

    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"amount": 5000}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "missing required field: email");

    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .set_json(json!({"email": "buyer@example.com", "amount": -3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/paystack/transaction/initialize")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");

    mock.assert_hits_async(0).await;
}

#[actix_rt::test]
async fn test_malformed_body_counts_as_invalid() {
    paystack_relay_server::metrics::register_metrics();
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = init_app!(state);
    let invalid = || {
        paystack_relay_server::metrics::REQUESTS_TOTAL
            .with_label_values(&["create_subaccount", "invalid"])
            .get()
    };
    let before = invalid();

    let req = test::TestRequest::post()
        .uri("/create-subaccount")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    assert!(invalid() > before);
}

fn subaccount_body() -> serde_json::Value {
    json!({
        "business_name": "Oasis",
        "settlement_bank": "058",
        "account_number": "0123456047",
        "percentage_charge": 20
    })
}

#[actix_rt::test]
async fn test_create_subaccount_existing_match_returns_200() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/subaccount")
                .header("Authorization", format!("Bearer {SECRET}"));
            then.status(200).json_body(json!({
                "status": true,
                "message": "Subaccounts retrieved",
                "data": [
                    {"subaccount_code": "ACCT_other", "account_number": "1111111111",
                     "settlement_bank": "Access Bank", "business_name": "Other"},
                    {"subaccount_code": "ACCT_oasis", "account_number": "0123456047",
                     "settlement_bank": "Oasis Microfinance Bank", "business_name": "Oasis Ventures"}
                ],
                "meta": {"total": 2, "skipped": 0, "perPage": 100, "page": 1, "pageCount": 1}
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/subaccount");
            then.status(201).json_body(json!({
                "status": true,
                "data": {"subaccount_code": "ACCT_new"}
            }));
        })
        .await;

    let state = make_state(
        &server.base_url(),
        &[("SUBACCOUNT_MATCH", "settlement-bank-contains")],
    );
    let app = init_app!(state);
    let req = test::TestRequest::post()
        .uri("/create-subaccount")
        .set_json(subaccount_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["subaccount_code"], "ACCT_oasis");
    assert_eq!(body["message"], "Subaccount already exists");
    list.assert_hits_async(1).await;
    create.assert_hits_async(0).await;
}

#[actix_rt::test]
async fn test_create_subaccount_without_match_creates_once() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/subaccount");
            then.status(200).json_body(json!({
                "status": true,
                "data": [
                    {"subaccount_code": "ACCT_oasis", "account_number": "0123456047",
                     "settlement_bank": "Oasis Microfinance Bank", "business_name": "Oasis Ventures"}
                ],
                "meta": {"total": 1, "perPage": 100, "page": 1, "pageCount": 1}
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/subaccount").json_body(json!({
                "business_name": "Oasis",
                "settlement_bank": "058",
                "account_number": "0123456047",
                "percentage_charge": 20.0
            }));
            then.status(201).json_body(json!({
                "status": true,
                "message": "Subaccount created",
                "data": {"subaccount_code": "ACCT_new", "business_name": "Oasis"}
            }));
        })
        .await;

    // Default policy requires an exact business name, so "Oasis Ventures" is no match.
    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/create-subaccount")
        .set_json(subaccount_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["subaccount_code"], "ACCT_new");
    assert_eq!(body["message"], "Subaccount created successfully");
    list.assert_hits_async(1).await;
    create.assert_hits_async(1).await;
}

#[actix_rt::test]
async fn test_create_subaccount_unauthorized_stops_after_first_call() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/subaccount");
            then.status(401)
                .json_body(json!({"status": false, "message": "Invalid key"}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/subaccount");
            then.status(201)
                .json_body(json!({"status": true, "data": {"subaccount_code": "ACCT_new"}}));
        })
        .await;

    let app = init_app!(make_state(&server.base_url(), &[]));
    let req = test::TestRequest::post()
        .uri("/create-subaccount")
        .set_json(subaccount_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Subaccount creation failed"}));
    list.assert_hits_async(1).await;
    create.assert_hits_async(0).await;
}

#[actix_rt::test]
async fn test_create_subaccount_validation_error_is_400() {
    let state = make_state("http://127.0.0.1:1", &[]);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create-subaccount")
        .set_json(json!({"business_name": "Oasis", "settlement_bank": "058"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "missing required field: account_number");
}

#[actix_rt::test]
async fn test_metrics_requires_token_when_configured() {
    let state = make_state("http://127.0.0.1:1", &[("METRICS_TOKEN", "scrape-me")]);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/metrics")
        .insert_header(("Authorization", "Bearer scrape-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
