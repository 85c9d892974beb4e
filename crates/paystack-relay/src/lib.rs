//! Core of the Paystack relay.
//!
//! Sits between a public HTTP surface and the Paystack REST API:
//!
//! - [`normalize`]: validates caller input and builds outbound payloads
//! - [`client`]: authenticated one-shot calls to Paystack ([`PaystackApi`])
//! - [`reconcile`]: find-or-create for subaccounts, avoiding duplicates
//! - [`shape`]: narrows response envelopes to the one field callers need
//!
//! # Example
//!
//! ```no_run
//! use paystack_relay::{
//!     build_transaction_payload, initialized_transaction_token, validate_payment_init,
//!     InitResponseField, NormalizerConfig, PaymentInitRequest, PaystackApi, PaystackClient,
//!     SecretKey,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = PaystackClient::new(
//!     reqwest::Client::new(),
//!     paystack_relay::client::DEFAULT_BASE_URL,
//!     SecretKey::new(std::env::var("PAYSTACK_SECRET_KEY").unwrap()),
//! );
//! let config = NormalizerConfig::default();
//!
//! let req = PaymentInitRequest {
//!     email: Some("buyer@example.com".into()),
//!     amount: Some(5000),
//!     subaccount_code: None,
//! };
//! let valid = validate_payment_init(&req, config.amount_unit).unwrap();
//! let envelope = client
//!     .initialize_transaction(&build_transaction_payload(&valid, &config))
//!     .await
//!     .unwrap();
//! let reference = initialized_transaction_token(&envelope, InitResponseField::Reference).unwrap();
//! # }
//! ```

pub mod client;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod shape;
pub mod types;

pub use client::{GatewayOperation, PaystackApi, PaystackClient, SecretKey};
pub use error::{PaystackError, ValidationError};
pub use normalize::{
    build_transaction_payload, validate_payment_init, validate_subaccount_request, AmountUnit,
    NormalizerConfig,
};
pub use reconcile::{
    find_existing_subaccount, find_or_create_subaccount, MatchPolicy, ReconcileOutcome,
    ReconcilerConfig,
};
pub use shape::{created_subaccount_code, extract_field, initialized_transaction_token, InitResponseField};
pub use types::{
    CreateSubaccountPayload, GatewayEnvelope, PageMeta, PaymentInitRequest, SplitAllocation,
    SplitConfig, SplitType, SubaccountRecord, SubaccountRequest, TransactionPayload,
    ValidatedPaymentInit,
};
