use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::metrics;
use crate::state::AppState;

pub const WELCOME: &str = "Welcome to the Paystack payment initialization API";

/// GET / - Liveness text
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body(WELCOME)
}

/// GET /health - Health check endpoint
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "paystack-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "amountUnit": state.config.normalizer.amount_unit.to_string(),
        "initResponseField": state.config.init_response_field.as_str(),
    }))
}

/// GET /metrics - Prometheus text, bearer-gated when METRICS_TOKEN is set
pub async fn metrics(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if !metrics::scrape_allowed(state.config.metrics_token.as_deref(), presented) {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "unauthorized",
            "message": "Valid Bearer token required for /metrics"
        }));
    }

    metrics::metrics_output()
        .map(|text| {
            HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4")
                .body(text)
        })
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "metrics encoding failed");
            HttpResponse::InternalServerError().finish()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics));
}
