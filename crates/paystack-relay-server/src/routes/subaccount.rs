use actix_web::{web, HttpResponse};
use paystack_relay::{
    find_or_create_subaccount, validate_subaccount_request, PaystackApi, ReconcileOutcome,
    ReconcilerConfig, SubaccountRequest,
};
use std::time::Instant;

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) const ROUTE: &str = "create_subaccount";
pub(crate) const PATH: &str = "/create-subaccount";

pub async fn reconcile_subaccount<G: PaystackApi>(
    gateway: &G,
    req: &SubaccountRequest,
    config: &ReconcilerConfig,
) -> Result<ReconcileOutcome, ApiError> {
    let payload = validate_subaccount_request(req)?;
    find_or_create_subaccount(gateway, &payload, config)
        .await
        .map_err(ApiError::Subaccount)
}

/// POST /create-subaccount
///
/// 201 when a subaccount was created, 200 when a matching one already existed.
pub async fn create_subaccount(
    body: web::Json<SubaccountRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let started = Instant::now();
    let result = reconcile_subaccount(&state.paystack, &body, &state.config.reconciler).await;
    let ok_outcome = match &result {
        Ok(outcome) => outcome.as_str(),
        Err(_) => "failed",
    };
    super::observe(ROUTE, started, &result, ok_outcome);

    let outcome = result?;
    let (mut builder, message) = match outcome {
        ReconcileOutcome::Created(_) => (HttpResponse::Created(), "Subaccount created successfully"),
        ReconcileOutcome::Existing(_) => (HttpResponse::Ok(), "Subaccount already exists"),
    };
    Ok(builder.json(serde_json::json!({
        "message": message,
        "subaccount_code": outcome.subaccount_code(),
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(PATH, web::post().to(create_subaccount));
}
