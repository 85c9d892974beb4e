use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paystack_relay_server::{config::RelayConfig, metrics::register_metrics, state::AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();
    let rate_limit_rpm = config.rate_limit_rpm;

    tracing::info!("Starting paystack-relay on port {}", port);
    tracing::info!("Paystack API: {}", config.base_url);
    tracing::info!(
        "Amount unit: {}, split share: {}%, init response field: {}",
        config.normalizer.amount_unit,
        config.normalizer.split_share,
        config.init_response_field
    );
    tracing::info!(
        "Subaccount matching: {} (page size {}, max {} pages)",
        config.reconciler.match_policy,
        config.reconciler.page_size,
        config.reconciler.max_pages
    );

    register_metrics();

    let state = AppState::new(config).map_err(std::io::Error::other)?;
    let state_data = web::Data::new(state);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm as u64)
        .finish()
        .ok_or_else(|| std::io::Error::other("invalid rate limiter configuration"))?;

    HttpServer::new(move || {
        let cors = paystack_relay_server::cors::build_cors(&allowed_origins);

        App::new()
            .app_data(state_data.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .configure(paystack_relay_server::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
