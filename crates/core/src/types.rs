//! Data model shared by the gateway, the aggregator, and the stream controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Decision label returned by the scoring service.
///
/// Labels are matched exactly (case-sensitive). Anything outside the known set
/// is kept as `Unrecognized` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    Approve,
    Review,
    Block,
    #[default]
    Pending,
    Unrecognized(String),
}

impl Decision {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "approve" => Self::Approve,
            "review" => Self::Review,
            "block" => Self::Block,
            "pending" => Self::Pending,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Approve => "approve",
            Self::Review => "review",
            Self::Block => "block",
            Self::Pending => "pending",
            Self::Unrecognized(label) => label,
        }
    }
}

impl From<String> for Decision {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        decision.label().to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A transaction pulled from the external queue, not yet scored.
///
/// The JSON object is kept verbatim so it can be submitted back to the
/// ingest endpoint unchanged, including fields this crate knows nothing about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingTransaction {
    fields: Map<String, Value>,
}

impl PendingTransaction {
    #[must_use]
    pub const fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.str_field("user_id")
    }

    /// The `type` field (deposit, withdrawal, trade, transfer, ...).
    #[must_use]
    pub fn transaction_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.fields.get("amount").and_then(Value::as_f64)
    }

    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.str_field("currency")
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.str_field("country")
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field("timestamp")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Outcome of submitting one transaction for scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Transaction id echoed back by the service, if any.
    pub transaction_id: Option<String>,
    pub risk_score: f64,
    pub decision: Decision,
    /// Case opened by the service for review/block decisions.
    pub case_id: Option<String>,
}

/// Display-ready projection of a scored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub currency: String,
    pub country: String,
    pub risk_score: f64,
    pub decision: Decision,
    pub case_id: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Builds an entry, filling absent transaction fields with display defaults.
    #[must_use]
    pub fn project(
        tx: &PendingTransaction,
        result: &IngestionResult,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let id = result
            .transaction_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| tx.id())
            .unwrap_or("unknown");

        Self {
            id: id.to_string(),
            user_id: tx.user_id().unwrap_or("unknown").to_string(),
            transaction_type: tx.transaction_type().unwrap_or("unknown").to_string(),
            amount: tx.amount().unwrap_or(0.0),
            currency: tx.currency().unwrap_or("USD").to_string(),
            country: tx.country().unwrap_or("N/A").to_string(),
            risk_score: result.risk_score,
            decision: result.decision.clone(),
            case_id: result.case_id.clone(),
            captured_at,
        }
    }
}

/// Running decision counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunningStats {
    pub total: u64,
    pub approve: u64,
    pub review: u64,
    pub block: u64,
}

impl RunningStats {
    /// Results that matched none of approve/review/block.
    #[must_use]
    pub const fn uncategorized(&self) -> u64 {
        self.total.saturating_sub(self.approve + self.review + self.block)
    }
}
