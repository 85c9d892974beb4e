//! Narrows Paystack envelopes down to the single field callers receive.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::client::GatewayOperation;
use crate::error::PaystackError;
use crate::types::GatewayEnvelope;

/// Which token the initialize route hands back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitResponseField {
    #[default]
    Reference,
    AccessCode,
}

impl InitResponseField {
    /// Key in `data`, reused as the key of the caller-facing JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            InitResponseField::Reference => "reference",
            InitResponseField::AccessCode => "access_code",
        }
    }
}

impl FromStr for InitResponseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(InitResponseField::Reference),
            "access_code" | "access-code" => Ok(InitResponseField::AccessCode),
            other => Err(format!(
                "unknown response field '{other}' (expected reference or access_code)"
            )),
        }
    }
}

impl fmt::Display for InitResponseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pull a string field out of `envelope.data`.
///
/// Absent, null or non-string values are a malformed response, never an
/// empty value.
pub fn extract_field(
    envelope: &GatewayEnvelope<Value>,
    operation: GatewayOperation,
    field: &'static str,
) -> Result<String, PaystackError> {
    envelope
        .data
        .as_ref()
        .and_then(|data| data.get(field))
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(PaystackError::MalformedResponse { operation, field })
}

/// The reference or access code of an initialized transaction.
pub fn initialized_transaction_token(
    envelope: &GatewayEnvelope<Value>,
    field: InitResponseField,
) -> Result<String, PaystackError> {
    extract_field(envelope, GatewayOperation::InitializeTransaction, field.as_str())
}

/// The code of a newly created subaccount.
pub fn created_subaccount_code(envelope: &GatewayEnvelope<Value>) -> Result<String, PaystackError> {
    extract_field(envelope, GatewayOperation::CreateSubaccount, "subaccount_code")
}
