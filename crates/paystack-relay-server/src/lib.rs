pub mod config;
pub mod cors;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::RelayConfig;
pub use error::ApiError;
pub use state::AppState;

use actix_web::web;

/// Largest accepted JSON request body.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Mount every route plus the JSON extractor configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(error::json_error_handler),
    );
    routes::health::configure(cfg);
    routes::transaction::configure(cfg);
    routes::subaccount::configure(cfg);
}
