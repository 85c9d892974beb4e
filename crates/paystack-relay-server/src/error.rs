use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use paystack_relay::{PaystackError, ValidationError};
use std::fmt;

pub const INITIALIZATION_FAILED: &str = "Payment initialization failed";
pub const SUBACCOUNT_FAILED: &str = "Subaccount creation failed";

#[derive(Debug)]
pub enum ApiError {
    /// Request body parsed but a field is missing or invalid
    Validation(ValidationError),
    /// Request body is not the expected JSON
    InvalidBody(String),
    /// Any failure while initializing a transaction with Paystack
    Initialization(PaystackError),
    /// Any failure while listing or creating subaccounts
    Subaccount(PaystackError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "validation error: {}", e),
            ApiError::InvalidBody(msg) => write!(f, "invalid request body: {}", msg),
            ApiError::Initialization(e) => write!(f, "transaction initialization failed: {}", e),
            ApiError::Subaccount(e) => write!(f, "subaccount operation failed: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

/// Log the upstream detail; the caller only ever sees the generic message.
fn log_upstream_failure(route: &str, e: &PaystackError) {
    if e.is_call_failure() {
        tracing::error!(
            route,
            upstream_status = e.upstream_status(),
            error = %e,
            "paystack call failed"
        );
    } else {
        tracing::error!(route, error = %e, "malformed or incomplete paystack response");
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(e) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_request",
                "message": e.to_string()
            })),
            ApiError::InvalidBody(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_request",
                "message": msg
            })),
            ApiError::Initialization(e) => {
                log_upstream_failure(crate::routes::transaction::ROUTE, e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": INITIALIZATION_FAILED
                }))
            }
            ApiError::Subaccount(e) => {
                log_upstream_failure(crate::routes::subaccount::ROUTE, e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": SUBACCOUNT_FAILED
                }))
            }
        }
    }
}

/// `JsonConfig` error handler: malformed JSON is the caller's fault, not ours.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = req.path(), error = %err, "rejected request body");
    crate::routes::record_rejected_body(req.path());
    ApiError::InvalidBody(err.to_string()).into()
}
