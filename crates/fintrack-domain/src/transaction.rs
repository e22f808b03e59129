//! Domain models for income and expense transactions.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    category::{Category, PaymentMethod},
    error::{ensure_positive, ValidationError},
};

/// A single recorded income or expense event.
///
/// `amount` is always an unsigned magnitude; `kind` carries the direction.
/// Signed amounts found in older exports are normalised when deserialised.
/// `date` accepts RFC 3339, a bare `YYYY-MM-DD` (midnight UTC) or epoch
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(deserialize_with = "deserialize_magnitude")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: Category,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: amount.abs(),
            kind,
            category,
            description: None,
            date,
            payment_method: None,
            sync_status: SyncStatus::Pending,
            remote_id: None,
        }
    }

    pub fn income(amount: f64, category: Category, date: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Income, amount, category, date)
    }

    pub fn expense(amount: f64, category: Category, date: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Expense, amount, category, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Unsigned magnitude of the transaction.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Amount with income positive and expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.magnitude(),
            TransactionKind::Expense => -self.magnitude(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Calendar day (UTC) on which the transaction occurred.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("amount", self.amount)
    }

    /// Applies every populated field of `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount.abs();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(status) = patch.sync_status {
            self.sync_status = status;
        }
        if let Some(remote_id) = patch.remote_id {
            self.remote_id = remote_id;
        }
    }
}

/// Partial update for a [`Transaction`]; `None` leaves a field unchanged.
///
/// Optional fields use a nested `Option` so callers can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<f64>,
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub description: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
    pub payment_method: Option<Option<PaymentMethod>>,
    pub sync_status: Option<SyncStatus>,
    pub remote_id: Option<Option<i64>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Direction of money flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Some(TransactionKind::Income),
            "expense" | "out" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// Remote synchronisation state of a locally recorded transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    #[default]
    Pending,
    Failed,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Pending => "pending",
            SyncStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

fn deserialize_magnitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(f64::abs)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp {millis} is out of range"))),
        RawTimestamp::Text(text) => parse_timestamp(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid date `{text}`"))),
    }
}

/// Parses an RFC 3339 instant or a `YYYY-MM-DD` day (taken as midnight UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn signed_amount_follows_kind() {
        let income = Transaction::income(2000.0, Category::Income, at(2024, 1, 1));
        let expense = Transaction::expense(50.0, Category::Food, at(2024, 1, 5));
        assert_eq!(income.signed_amount(), 2000.0);
        assert_eq!(expense.signed_amount(), -50.0);
    }

    #[test]
    fn constructor_stores_magnitude() {
        let expense = Transaction::expense(-50.0, Category::Food, at(2024, 1, 5));
        assert_eq!(expense.amount, 50.0);
        assert_eq!(expense.signed_amount(), -50.0);
    }

    #[test]
    fn signed_legacy_amounts_are_normalised() {
        let json = r#"{
            "id": "2f1c8a4e-8d4b-4a57-9d43-0f7c52d1a001",
            "amount": -50,
            "type": "expense",
            "category": "food",
            "date": "2024-01-05T00:00:00Z"
        }"#;
        let txn: Transaction = serde_json::from_str(json).expect("parse legacy record");
        assert_eq!(txn.amount, 50.0);
        assert_eq!(txn.signed_amount(), -50.0);
        assert_eq!(txn.sync_status, SyncStatus::Pending);
    }

    #[test]
    fn dates_accept_day_strings_and_epoch_millis() {
        let day_only = r#"{
            "id": "2f1c8a4e-8d4b-4a57-9d43-0f7c52d1a002",
            "amount": 50,
            "type": "expense",
            "category": "food",
            "date": "2024-01-05"
        }"#;
        let txn: Transaction = serde_json::from_str(day_only).expect("parse day-only date");
        assert_eq!(txn.date, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());

        let millis = r#"{
            "id": "2f1c8a4e-8d4b-4a57-9d43-0f7c52d1a003",
            "amount": 50,
            "type": "expense",
            "category": "food",
            "date": 1704412800000
        }"#;
        let txn: Transaction = serde_json::from_str(millis).expect("parse epoch millis");
        assert_eq!(txn.date, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());

        let offset = r#"{
            "id": "2f1c8a4e-8d4b-4a57-9d43-0f7c52d1a004",
            "amount": 50,
            "type": "expense",
            "category": "food",
            "date": "2024-01-05T02:00:00+02:00"
        }"#;
        let txn: Transaction = serde_json::from_str(offset).expect("parse offset date");
        assert_eq!(txn.date, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());

        let bad = day_only.replace("2024-01-05", "05/01/2024");
        let err = serde_json::from_str::<Transaction>(&bad).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn validate_rejects_zero_and_nan() {
        let mut txn = Transaction::expense(10.0, Category::Food, at(2024, 1, 5));
        assert!(txn.validate().is_ok());
        txn.amount = 0.0;
        assert!(matches!(
            txn.validate(),
            Err(ValidationError::NonPositiveAmount { .. })
        ));
        txn.amount = f64::NAN;
        assert!(matches!(
            txn.validate(),
            Err(ValidationError::NonFiniteAmount { .. })
        ));
    }

    #[test]
    fn patch_updates_only_populated_fields() {
        let mut txn = Transaction::expense(10.0, Category::Food, at(2024, 1, 5))
            .with_description("lunch");
        txn.apply(TransactionPatch {
            amount: Some(-12.5),
            category: Some(Category::Entertainment),
            ..TransactionPatch::default()
        });
        assert_eq!(txn.amount, 12.5);
        assert_eq!(txn.category, Category::Entertainment);
        assert_eq!(txn.description.as_deref(), Some("lunch"));
        assert!(txn.is_expense());

        txn.apply(TransactionPatch {
            description: Some(None),
            ..TransactionPatch::default()
        });
        assert!(txn.description.is_none());
    }
}
