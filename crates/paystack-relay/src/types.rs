//! Request, payload and envelope types exchanged with callers and with Paystack.

use serde::{Deserialize, Deserializer, Serialize};

/// Inbound body of `POST /paystack/transaction/initialize`.
///
/// Fields are optional here so that a missing field is reported by
/// validation with its name instead of as a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitRequest {
    pub email: Option<String>,
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount_code: Option<String>,
}

/// A payment request that passed validation, with the amount already in kobo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaymentInit {
    pub email: String,
    pub amount_minor: u64,
    pub subaccount_code: Option<String>,
}

/// Outbound body of `POST /transaction/initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPayload {
    pub email: String,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitConfig>,
}

/// Dynamic split attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitConfig {
    #[serde(rename = "type")]
    pub split_type: SplitType,
    pub subaccounts: Vec<SplitAllocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Percentage,
}

/// One share of a split: the subaccount receiving it and its percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitAllocation {
    pub subaccount: String,
    pub share: u8,
}

/// Inbound body of `POST /create-subaccount`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubaccountRequest {
    pub business_name: Option<String>,
    pub settlement_bank: Option<String>,
    pub account_number: Option<String>,
    pub percentage_charge: Option<f64>,
}

/// Outbound body of `POST /subaccount`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSubaccountPayload {
    pub business_name: String,
    pub settlement_bank: String,
    pub account_number: String,
    pub percentage_charge: f64,
}

/// Subaccount as returned by `GET /subaccount`. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubaccountRecord {
    #[serde(default, deserialize_with = "nullable_string")]
    pub subaccount_code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub account_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub settlement_bank: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub business_name: String,
}

/// The `{status, message, data, meta}` wrapper around every Paystack response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayEnvelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Pagination block on list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub per_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page_count: Option<u32>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Paystack sends some meta counters as strings ("perPage": "50").
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u32),
        Str(String),
    }

    Ok(match Option::<NumOrStr>::deserialize(deserializer)? {
        Some(NumOrStr::Num(n)) => Some(n),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_request_uses_camel_case() {
        let req: PaymentInitRequest = serde_json::from_str(
            r#"{"email":"a@b.co","amount":5000,"subaccountCode":"ACCT_1"}"#,
        )
        .unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
        assert_eq!(req.amount, Some(5000));
        assert_eq!(req.subaccount_code.as_deref(), Some("ACCT_1"));
    }

    #[test]
    fn test_split_wire_shape() {
        let split = SplitConfig {
            split_type: SplitType::Percentage,
            subaccounts: vec![SplitAllocation {
                subaccount: "ACCT_1".to_string(),
                share: 50,
            }],
        };
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "percentage",
                "subaccounts": [{"subaccount": "ACCT_1", "share": 50}]
            })
        );
    }

    #[test]
    fn test_subaccount_record_ignores_extra_and_null_fields() {
        let record: SubaccountRecord = serde_json::from_value(serde_json::json!({
            "id": 55,
            "subaccount_code": "ACCT_x",
            "account_number": "0123456047",
            "settlement_bank": "Oasis Bank",
            "business_name": null,
            "percentage_charge": 20.0,
        }))
        .unwrap();
        assert_eq!(record.subaccount_code, "ACCT_x");
        assert_eq!(record.business_name, "");
    }

    #[test]
    fn test_page_meta_accepts_string_counters() {
        let meta: PageMeta = serde_json::from_value(serde_json::json!({
            "total": 120,
            "skipped": 0,
            "perPage": "50",
            "page": 1,
            "pageCount": 3,
        }))
        .unwrap();
        assert_eq!(meta.per_page, Some(50));
        assert_eq!(meta.page_count, Some(3));
    }

    #[test]
    fn test_envelope_without_data() {
        let env: GatewayEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":false,"message":"Invalid key"}"#).unwrap();
        assert!(!env.status);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("Invalid key"));
    }
}
