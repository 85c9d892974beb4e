pub mod health;
pub mod subaccount;
pub mod transaction;

use std::time::Instant;

use crate::error::ApiError;
use crate::metrics;

/// Metric label for the route serving `path`.
pub(crate) fn route_label(path: &str) -> &'static str {
    match path.trim_end_matches('/') {
        transaction::PATH => transaction::ROUTE,
        subaccount::PATH => subaccount::ROUTE,
        _ => "other",
    }
}

/// Count a request whose body never reached its handler.
pub(crate) fn record_rejected_body(path: &str) {
    metrics::REQUESTS_TOTAL
        .with_label_values(&[route_label(path), "invalid"])
        .inc();
}

/// Record the outcome and latency of one route invocation.
fn observe<T>(route: &str, started: Instant, result: &Result<T, ApiError>, ok_outcome: &str) {
    metrics::ROUTE_LATENCY
        .with_label_values(&[route])
        .observe(started.elapsed().as_secs_f64());

    let outcome = match result {
        Ok(_) => ok_outcome,
        Err(ApiError::Validation(_)) | Err(ApiError::InvalidBody(_)) => "invalid",
        Err(ApiError::Initialization(e)) | Err(ApiError::Subaccount(e)) => {
            metrics::UPSTREAM_FAILURES
                .with_label_values(&[route, e.kind()])
                .inc();
            "failed"
        }
    };
    metrics::REQUESTS_TOTAL
        .with_label_values(&[route, outcome])
        .inc();
}
