use std::env;
use std::str::FromStr;
use std::time::Duration;

use paystack_relay::client::DEFAULT_BASE_URL;
use paystack_relay::normalize::DEFAULT_SPLIT_SHARE;
use paystack_relay::reconcile::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use paystack_relay::{
    AmountUnit, InitResponseField, MatchPolicy, NormalizerConfig, ReconcilerConfig, SecretKey,
};
use url::Url;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_RATE_LIMIT_RPM: u32 = 60;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct RelayConfig {
    /// Paystack secret key sent as the bearer credential
    pub secret_key: SecretKey,
    /// Paystack API base URL
    pub base_url: String,
    /// Server port
    pub port: u16,
    /// CORS allowed origins (`*` allows any)
    pub allowed_origins: Vec<String>,
    /// Rate limit requests per minute per IP
    pub rate_limit_rpm: u32,
    /// Timeout applied to every Paystack call
    pub upstream_timeout: Duration,
    /// Which token the initialize route returns
    pub init_response_field: InitResponseField,
    pub normalizer: NormalizerConfig,
    pub reconciler: ReconcilerConfig,
    /// Bearer token required for /metrics (None = public)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("secret_key", &self.secret_key)
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("init_response_field", &self.init_response_field)
            .field("normalizer", &self.normalizer)
            .field("reconciler", &self.reconciler)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Required: secret key
        let secret_key = get("PAYSTACK_SECRET_KEY")
            .map(SecretKey::new)
            .ok_or(ConfigError::MissingRequired("PAYSTACK_SECRET_KEY"))?;

        let base_url = get("PAYSTACK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|_| ConfigError::InvalidUrl(base_url.clone()))?;

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        let allowed_origins: Vec<String> = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);
        if allowed_origins.is_empty() {
            return Err(ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                reason: "no origins listed".to_string(),
            });
        }

        let rate_limit_rpm = parse_or(
            "RATE_LIMIT_RPM",
            get("RATE_LIMIT_RPM"),
            DEFAULT_RATE_LIMIT_RPM,
        )?;
        if rate_limit_rpm == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_RPM",
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = parse_or(
            "UPSTREAM_TIMEOUT_SECS",
            get("UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;

        let init_response_field = parse_or(
            "INIT_RESPONSE_FIELD",
            get("INIT_RESPONSE_FIELD"),
            InitResponseField::default(),
        )?;

        let amount_unit = parse_or("AMOUNT_UNIT", get("AMOUNT_UNIT"), AmountUnit::default())?;
        let split_share = parse_or(
            "SPLIT_SHARE_PERCENT",
            get("SPLIT_SHARE_PERCENT"),
            DEFAULT_SPLIT_SHARE,
        )?;
        if !(1..=100).contains(&split_share) {
            return Err(ConfigError::Invalid {
                key: "SPLIT_SHARE_PERCENT",
                reason: "must be between 1 and 100".to_string(),
            });
        }

        let match_policy = parse_or(
            "SUBACCOUNT_MATCH",
            get("SUBACCOUNT_MATCH"),
            MatchPolicy::default(),
        )?;
        let page_size = parse_or(
            "SUBACCOUNT_PAGE_SIZE",
            get("SUBACCOUNT_PAGE_SIZE"),
            DEFAULT_PAGE_SIZE,
        )?;
        let max_pages = parse_or(
            "SUBACCOUNT_MAX_PAGES",
            get("SUBACCOUNT_MAX_PAGES"),
            DEFAULT_MAX_PAGES,
        )?;
        if page_size == 0 || max_pages == 0 {
            return Err(ConfigError::Invalid {
                key: "SUBACCOUNT_PAGE_SIZE/SUBACCOUNT_MAX_PAGES",
                reason: "must be at least 1".to_string(),
            });
        }
        if match_policy == MatchPolicy::SettlementBankContains {
            tracing::warn!(
                "SUBACCOUNT_MATCH=settlement-bank-contains compares the settlement bank against \
                 the business name; prefer business-name"
            );
        }

        let metrics_token = get("METRICS_TOKEN");
        if metrics_token.is_none() {
            tracing::warn!("METRICS_TOKEN not set, /metrics endpoint is publicly accessible");
        }

        Ok(Self {
            secret_key,
            base_url,
            port,
            allowed_origins,
            rate_limit_rpm,
            upstream_timeout: Duration::from_secs(timeout_secs),
            init_response_field,
            normalizer: NormalizerConfig {
                amount_unit,
                split_share,
            },
            reconciler: ReconcilerConfig {
                match_policy,
                page_size,
                max_pages,
            },
            metrics_token,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{v}': {e}"),
        }),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
