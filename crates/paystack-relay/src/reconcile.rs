//! Find-or-create for subaccounts.
//!
//! Paystack happily creates duplicate subaccounts for the same bank account,
//! so before creating one we page through the existing subaccounts looking
//! for a match. A listing that cannot be completed within `max_pages` is an
//! error: creating after a partial scan could duplicate.

use std::fmt;
use std::str::FromStr;

use crate::client::{GatewayOperation, PaystackApi};
use crate::error::PaystackError;
use crate::shape::created_subaccount_code;
use crate::types::{CreateSubaccountPayload, PageMeta, SubaccountRecord};

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// How an existing subaccount is recognised as the one being requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Same account number and same business name.
    #[default]
    BusinessName,
    /// Same account number and a settlement bank containing the requested
    /// business name. Kept for deployments relying on the old matching.
    SettlementBankContains,
}

impl MatchPolicy {
    pub fn matches(self, record: &SubaccountRecord, req: &CreateSubaccountPayload) -> bool {
        if record.account_number.trim() != req.account_number {
            return false;
        }
        match self {
            MatchPolicy::BusinessName => record.business_name.trim() == req.business_name,
            MatchPolicy::SettlementBankContains => {
                record.settlement_bank.contains(req.business_name.as_str())
            }
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business-name" | "business_name" => Ok(MatchPolicy::BusinessName),
            "settlement-bank-contains" | "settlement_bank_contains" => {
                Ok(MatchPolicy::SettlementBankContains)
            }
            other => Err(format!(
                "unknown match policy '{other}' (expected business-name or settlement-bank-contains)"
            )),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::BusinessName => f.write_str("business-name"),
            MatchPolicy::SettlementBankContains => f.write_str("settlement-bank-contains"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub match_policy: MatchPolicy,
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Result of [`find_or_create_subaccount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A matching subaccount already existed; nothing was created.
    Existing(String),
    /// A new subaccount was created.
    Created(String),
}

impl ReconcileOutcome {
    pub fn subaccount_code(&self) -> &str {
        match self {
            ReconcileOutcome::Existing(code) | ReconcileOutcome::Created(code) => code,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, ReconcileOutcome::Created(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Existing(_) => "existing",
            ReconcileOutcome::Created(_) => "created",
        }
    }
}

/// Whether another page may hold more subaccounts.
fn has_more_pages(page: u32, returned: usize, page_size: u32, meta: Option<&PageMeta>) -> bool {
    if returned == 0 {
        return false;
    }
    if let Some(meta) = meta {
        if let Some(page_count) = meta.page_count {
            return page < page_count;
        }
        if let (Some(total), Some(per_page)) = (meta.total, meta.per_page) {
            return u64::from(page) * u64::from(per_page) < u64::from(total);
        }
    }
    returned >= page_size as usize
}

/// Page through existing subaccounts and return the first match.
pub async fn find_existing_subaccount<G: PaystackApi>(
    gateway: &G,
    req: &CreateSubaccountPayload,
    config: &ReconcilerConfig,
) -> Result<Option<SubaccountRecord>, PaystackError> {
    for page in 1..=config.max_pages {
        let envelope = gateway.list_subaccounts(page, config.page_size).await?;
        let records = envelope.data.unwrap_or_default();

        if let Some(found) = records
            .iter()
            .find(|r| config.match_policy.matches(r, req))
        {
            return Ok(Some(found.clone()));
        }

        if !has_more_pages(page, records.len(), config.page_size, envelope.meta.as_ref()) {
            tracing::debug!(pages = page, "subaccount listing exhausted without a match");
            return Ok(None);
        }
    }

    tracing::error!(
        max_pages = config.max_pages,
        page_size = config.page_size,
        "subaccount listing exceeded page bound"
    );
    Err(PaystackError::PaginationLimitExceeded {
        max_pages: config.max_pages,
    })
}

/// Return the matching subaccount's code, creating the subaccount only when
/// no match exists. At most one create call is issued.
pub async fn find_or_create_subaccount<G: PaystackApi>(
    gateway: &G,
    req: &CreateSubaccountPayload,
    config: &ReconcilerConfig,
) -> Result<ReconcileOutcome, PaystackError> {
    if let Some(existing) = find_existing_subaccount(gateway, req, config).await? {
        if existing.subaccount_code.is_empty() {
            return Err(PaystackError::MalformedResponse {
                operation: GatewayOperation::ListSubaccounts,
                field: "subaccount_code",
            });
        }
        tracing::info!(
            subaccount_code = %existing.subaccount_code,
            policy = %config.match_policy,
            "matched existing subaccount"
        );
        return Ok(ReconcileOutcome::Existing(existing.subaccount_code));
    }

    let envelope = gateway.create_subaccount(req).await?;
    let code = created_subaccount_code(&envelope)?;
    tracing::info!(subaccount_code = %code, "created subaccount");
    Ok(ReconcileOutcome::Created(code))
}
