use crate::config::RelayConfig;
use paystack_relay::PaystackClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub paystack: PaystackClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let paystack =
            PaystackClient::new(http_client, &config.base_url, config.secret_key.clone());

        Ok(Self {
            config: Arc::new(config),
            paystack,
        })
    }
}
