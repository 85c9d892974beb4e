use thiserror::Error;

use crate::client::GatewayOperation;

/// Errors returned by calls to the Paystack API.
///
/// `Transport`, `Status`, `Decode` and `Rejected` are all "the call failed";
/// `MalformedResponse` means the call succeeded but the envelope lacked the
/// field the caller needed.
#[derive(Debug, Error)]
pub enum PaystackError {
    #[error("{operation} transport failure: {detail}")]
    Transport {
        operation: GatewayOperation,
        detail: String,
    },

    #[error("{operation} returned HTTP {status}: {message}")]
    Status {
        operation: GatewayOperation,
        status: u16,
        message: String,
    },

    #[error("{operation} response could not be decoded: {detail}")]
    Decode {
        operation: GatewayOperation,
        detail: String,
    },

    #[error("{operation} rejected by gateway: {message}")]
    Rejected {
        operation: GatewayOperation,
        message: String,
    },

    #[error("{operation} response is missing `data.{field}`")]
    MalformedResponse {
        operation: GatewayOperation,
        field: &'static str,
    },

    #[error("subaccount listing still had pages left after {max_pages} pages")]
    PaginationLimitExceeded { max_pages: u32 },
}

impl PaystackError {
    /// True for failures of the call itself (transport, HTTP status, body).
    pub fn is_call_failure(&self) -> bool {
        matches!(
            self,
            PaystackError::Transport { .. }
                | PaystackError::Status { .. }
                | PaystackError::Decode { .. }
                | PaystackError::Rejected { .. }
        )
    }

    /// Upstream HTTP status, when the gateway answered with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PaystackError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PaystackError::Transport { .. } => "transport",
            PaystackError::Status { .. } => "status",
            PaystackError::Decode { .. } => "decode",
            PaystackError::Rejected { .. } => "rejected",
            PaystackError::MalformedResponse { .. } => "malformed",
            PaystackError::PaginationLimitExceeded { .. } => "pagination_limit",
        }
    }
}

/// Caller input that cannot be forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
