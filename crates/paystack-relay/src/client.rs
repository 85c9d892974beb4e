//! HTTP client for the Paystack REST API.
//!
//! Every call is one-shot: no retries and no circuit breaking. Any transport
//! failure, non-2xx status, undecodable body or `status: false` envelope is
//! returned as a [`PaystackError`] call failure.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::PaystackError;
use crate::types::{
    CreateSubaccountPayload, GatewayEnvelope, SubaccountRecord, TransactionPayload,
};

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// The three Paystack calls the relay makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    InitializeTransaction,
    ListSubaccounts,
    CreateSubaccount,
}

impl GatewayOperation {
    pub fn method(self) -> reqwest::Method {
        match self {
            GatewayOperation::InitializeTransaction | GatewayOperation::CreateSubaccount => {
                reqwest::Method::POST
            }
            GatewayOperation::ListSubaccounts => reqwest::Method::GET,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            GatewayOperation::InitializeTransaction => "/transaction/initialize",
            GatewayOperation::ListSubaccounts | GatewayOperation::CreateSubaccount => {
                "/subaccount"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GatewayOperation::InitializeTransaction => "initialize_transaction",
            GatewayOperation::ListSubaccounts => "list_subaccounts",
            GatewayOperation::CreateSubaccount => "create_subaccount",
        }
    }
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paystack secret key. Never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// The Paystack calls the relay depends on.
pub trait PaystackApi: Send + Sync {
    /// `POST /transaction/initialize`
    fn initialize_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> impl Future<Output = Result<GatewayEnvelope<Value>, PaystackError>> + Send;

    /// `GET /subaccount` for one page (1-based).
    fn list_subaccounts(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<GatewayEnvelope<Vec<SubaccountRecord>>, PaystackError>> + Send;

    /// `POST /subaccount`
    fn create_subaccount(
        &self,
        payload: &CreateSubaccountPayload,
    ) -> impl Future<Output = Result<GatewayEnvelope<Value>, PaystackError>> + Send;
}

/// [`PaystackApi`] over HTTPS with bearer authentication.
#[derive(Debug, Clone)]
pub struct PaystackClient {
    http: reqwest::Client,
    base_url: String,
    secret: SecretKey,
}

impl PaystackClient {
    pub fn new(http: reqwest::Client, base_url: &str, secret: SecretKey) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<B, T>(
        &self,
        operation: GatewayOperation,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<GatewayEnvelope<T>, PaystackError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, operation.path());
        let mut request = self
            .http
            .request(operation.method(), url.as_str())
            .bearer_auth(self.secret.expose());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%operation, error = %e, "paystack request failed");
            PaystackError::Transport {
                operation,
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| PaystackError::Transport {
            operation,
            detail: format!("failed to read body: {e}"),
        })?;

        tracing::debug!(
            %operation,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "paystack call completed"
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<GatewayEnvelope<Value>>(&bytes)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(PaystackError::Status {
                operation,
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GatewayEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| PaystackError::Decode {
                operation,
                detail: e.to_string(),
            })?;

        if !envelope.status {
            return Err(PaystackError::Rejected {
                operation,
                message: envelope.message.unwrap_or_default(),
            });
        }

        Ok(envelope)
    }
}

impl PaystackApi for PaystackClient {
    async fn initialize_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<GatewayEnvelope<Value>, PaystackError> {
        self.call(GatewayOperation::InitializeTransaction, &[], Some(payload))
            .await
    }

    async fn list_subaccounts(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<GatewayEnvelope<Vec<SubaccountRecord>>, PaystackError> {
        let query = [("perPage", per_page.to_string()), ("page", page.to_string())];
        self.call::<(), _>(GatewayOperation::ListSubaccounts, &query, None)
            .await
    }

    async fn create_subaccount(
        &self,
        payload: &CreateSubaccountPayload,
    ) -> Result<GatewayEnvelope<Value>, PaystackError> {
        self.call(GatewayOperation::CreateSubaccount, &[], Some(payload))
            .await
    }
}
