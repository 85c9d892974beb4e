use actix_web::{web, HttpResponse};
use paystack_relay::{
    build_transaction_payload, initialized_transaction_token, validate_payment_init,
    InitResponseField, NormalizerConfig, PaymentInitRequest, PaystackApi,
};
use std::time::Instant;

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) const ROUTE: &str = "transaction_initialize";
pub(crate) const PATH: &str = "/paystack/transaction/initialize";

/// Validate, normalize, call Paystack and shape the reply.
///
/// Returns the configured field name together with its value.
pub async fn initialize_transaction<G: PaystackApi>(
    gateway: &G,
    req: &PaymentInitRequest,
    normalizer: &NormalizerConfig,
    field: InitResponseField,
) -> Result<(InitResponseField, String), ApiError> {
    let valid = validate_payment_init(req, normalizer.amount_unit)?;
    let payload = build_transaction_payload(&valid, normalizer);

    tracing::info!(
        amount = payload.amount,
        split = payload.split.is_some(),
        "initializing transaction"
    );

    let envelope = gateway
        .initialize_transaction(&payload)
        .await
        .map_err(ApiError::Initialization)?;
    let token = initialized_transaction_token(&envelope, field).map_err(ApiError::Initialization)?;
    Ok((field, token))
}

/// POST /paystack/transaction/initialize
pub async fn initialize(
    body: web::Json<PaymentInitRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let started = Instant::now();
    let result = initialize_transaction(
        &state.paystack,
        &body,
        &state.config.normalizer,
        state.config.init_response_field,
    )
    .await;
    super::observe(ROUTE, started, &result, "ok");

    let (field, token) = result?;
    let mut reply = serde_json::Map::new();
    reply.insert(field.as_str().to_string(), serde_json::Value::String(token));
    Ok(HttpResponse::Ok().json(reply))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(PATH, web::post().to(initialize));
}
