//! Turns caller input into the exact bodies sent to Paystack.
//!
//! Validation ([`validate_payment_init`], [`validate_subaccount_request`]) is
//! the only fallible step. [`build_transaction_payload`] is a pure function of
//! already-validated input.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{
    CreateSubaccountPayload, PaymentInitRequest, SplitAllocation, SplitConfig, SplitType,
    SubaccountRequest, TransactionPayload, ValidatedPaymentInit,
};

/// Kobo per naira.
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Share given to the subaccount when the caller names one.
pub const DEFAULT_SPLIT_SHARE: u8 = 50;

/// Unit the public API expects `amount` in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountUnit {
    /// Kobo; forwarded unchanged.
    #[default]
    Minor,
    /// Naira; multiplied by [`MINOR_UNITS_PER_MAJOR`] once.
    Major,
}

impl AmountUnit {
    /// Convert a caller amount to kobo. `None` on overflow.
    pub fn to_minor(self, amount: u64) -> Option<u64> {
        match self {
            AmountUnit::Minor => Some(amount),
            AmountUnit::Major => amount.checked_mul(MINOR_UNITS_PER_MAJOR),
        }
    }
}

impl FromStr for AmountUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" | "kobo" => Ok(AmountUnit::Minor),
            "major" | "naira" => Ok(AmountUnit::Major),
            other => Err(format!("unknown amount unit '{other}' (expected minor or major)")),
        }
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountUnit::Minor => f.write_str("minor"),
            AmountUnit::Major => f.write_str("major"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub amount_unit: AmountUnit,
    /// Percentage (1..=100) routed to the subaccount named in the request.
    pub split_share: u8,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            amount_unit: AmountUnit::default(),
            split_share: DEFAULT_SPLIT_SHARE,
        }
    }
}

/// Check a payment request and apply the unit policy.
pub fn validate_payment_init(
    req: &PaymentInitRequest,
    unit: AmountUnit,
) -> Result<ValidatedPaymentInit, ValidationError> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(ValidationError::MissingField("email"))?;
    if !email.contains('@') {
        return Err(ValidationError::invalid("email", "must be an email address"));
    }

    let amount = req.amount.ok_or(ValidationError::MissingField("amount"))?;
    let amount = u64::try_from(amount)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| ValidationError::invalid("amount", "must be a positive integer"))?;
    let amount_minor = unit
        .to_minor(amount)
        .ok_or_else(|| ValidationError::invalid("amount", "too large"))?;

    let subaccount_code = req
        .subaccount_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ValidatedPaymentInit {
        email: email.to_string(),
        amount_minor,
        subaccount_code,
    })
}

/// Build the `POST /transaction/initialize` body.
///
/// The split is attached only when a subaccount code is present, and then
/// holds a single allocation of `config.split_share` percent.
pub fn build_transaction_payload(
    req: &ValidatedPaymentInit,
    config: &NormalizerConfig,
) -> TransactionPayload {
    let split = req.subaccount_code.as_ref().map(|code| SplitConfig {
        split_type: SplitType::Percentage,
        subaccounts: vec![SplitAllocation {
            subaccount: code.clone(),
            share: config.split_share,
        }],
    });

    TransactionPayload {
        email: req.email.clone(),
        amount: req.amount_minor,
        split,
    }
}

/// Check a subaccount request and produce the `POST /subaccount` body.
pub fn validate_subaccount_request(
    req: &SubaccountRequest,
) -> Result<CreateSubaccountPayload, ValidationError> {
    fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(ValidationError::MissingField(field))
    }

    let business_name = required(&req.business_name, "business_name")?;
    let settlement_bank = required(&req.settlement_bank, "settlement_bank")?;
    let account_number = required(&req.account_number, "account_number")?;
    if !account_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid(
            "account_number",
            "must contain only digits",
        ));
    }

    let percentage_charge = req
        .percentage_charge
        .ok_or(ValidationError::MissingField("percentage_charge"))?;
    if !percentage_charge.is_finite() || !(0.0..=100.0).contains(&percentage_charge) {
        return Err(ValidationError::invalid(
            "percentage_charge",
            "must be between 0 and 100",
        ));
    }

    Ok(CreateSubaccountPayload {
        business_name,
        settlement_bank,
        account_number,
        percentage_charge,
    })
}
