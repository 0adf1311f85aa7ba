//! REST client for the FraudOps scoring service.
//!
//! # Example
//!
//! ```ignore
//! use fraudops_core::GatewayConfig;
//! use fraudops_gateway::ScoringClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScoringClient::new(GatewayConfig::default())?;
//!
//!     if let Some(tx) = client.fetch_next().await? {
//!         let result = client.submit(&tx).await?;
//!         println!("{} scored {} ({})", tx.id().unwrap_or("?"), result.risk_score, result.decision);
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{GatewayError, Result};
use crate::traits::TransactionGateway;
use async_trait::async_trait;
use fraudops_core::{Decision, GatewayConfig, IngestionResult, PendingTransaction};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Queue endpoint returning the next pending transaction.
pub const NEXT_PATH: &str = "/transactions/next";

/// Ingest-and-score endpoint.
pub const INGEST_PATH: &str = "/transactions/ingest";

/// Synthetic dataset generator that refills the queue.
pub const SEED_PATH: &str = "/transactions/seed";

// =============================================================================
// API Response Types
// =============================================================================

/// Response of the seed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedReport {
    pub transactions_created: u64,
    pub message: String,
}

/// Parses the body of `GET /transactions/next`.
///
/// Empty bodies and JSON `null` mean the queue has nothing pending.
fn parse_next_body(body: &str) -> Result<Option<PendingTransaction>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| GatewayError::malformed(NEXT_PATH, e.to_string()))?;

    match value {
        Value::Null => Ok(None),
        Value::Object(fields) => Ok(Some(PendingTransaction::from_fields(fields))),
        other => Err(GatewayError::malformed(
            NEXT_PATH,
            format!("expected a transaction object, got {}", json_kind(&other)),
        )),
    }
}

/// Parses the body of `POST /transactions/ingest`.
///
/// The body itself must be a JSON object. Inside it, absent, null or
/// wrongly typed fields fall back to defaults: score 0, decision `pending`.
fn parse_ingest_body(body: &str) -> Result<IngestionResult> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| GatewayError::malformed(INGEST_PATH, e.to_string()))?;

    match value {
        Value::Object(fields) => Ok(ingestion_result_from(&fields)),
        other => Err(GatewayError::malformed(
            INGEST_PATH,
            format!("expected a response object, got {}", json_kind(&other)),
        )),
    }
}

fn ingestion_result_from(fields: &Map<String, Value>) -> IngestionResult {
    let decision = fields.get("decision").and_then(Value::as_object);

    let label = decision
        .and_then(|d| d.get("decision"))
        .and_then(Value::as_str)
        .filter(|label| !label.is_empty());

    IngestionResult {
        transaction_id: fields
            .get("transaction")
            .and_then(|t| t.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        risk_score: decision
            .and_then(|d| d.get("risk_score"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        decision: label.map_or(Decision::Pending, Decision::from_label),
        case_id: fields
            .get("case_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// ScoringClient
// =============================================================================

/// HTTP client for the scoring service's transaction endpoints.
#[derive(Clone)]
pub struct ScoringClient {
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ScoringClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GatewayError::Configuration(
                "base URL cannot be empty".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Returns the base URL (without trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Converts a non-success status into an `Api` error carrying the body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(GatewayError::api(status.as_u16(), text))
    }

    /// Pulls one transaction from the queue.
    ///
    /// # Errors
    /// Returns error on network failure, non-success status, or a body that is
    /// neither empty, `null`, nor a JSON object.
    pub async fn fetch_next(&self) -> Result<Option<PendingTransaction>> {
        let url = self.url(NEXT_PATH);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = Self::check_status(response).await?.text().await?;
        parse_next_body(&body)
    }

    /// Submits a transaction verbatim for storage and scoring.
    ///
    /// # Errors
    /// Returns error on network failure, non-success status, or a body that is
    /// not a JSON object.
    pub async fn submit(&self, tx: &PendingTransaction) -> Result<IngestionResult> {
        let url = self.url(INGEST_PATH);
        let body = serde_json::to_vec(tx)?;
        tracing::debug!("POST {} body_len={}", url, body.len());

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let text = Self::check_status(response).await?.text().await?;
        parse_ingest_body(&text)
    }

    /// Asks the service to generate a synthetic dataset, refilling the queue.
    ///
    /// # Errors
    /// Returns error on network failure, non-success status, or an unreadable body.
    pub async fn seed(&self) -> Result<SeedReport> {
        let url = self.url(SEED_PATH);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let text = Self::check_status(response).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| GatewayError::malformed(SEED_PATH, e.to_string()))
    }
}

#[async_trait]
impl TransactionGateway for ScoringClient {
    async fn fetch_next(&self) -> Result<Option<PendingTransaction>> {
        Self::fetch_next(self).await
    }

    async fn submit(&self, tx: &PendingTransaction) -> Result<IngestionResult> {
        Self::submit(self, tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Config Tests ====================

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ScoringClient::new(GatewayConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(NEXT_PATH), "http://localhost:8000/transactions/next");
    }

    #[test]
    fn test_new_rejects_empty_base_url() {
        let err = ScoringClient::new(GatewayConfig {
            base_url: "  ".to_string(),
            timeout_secs: 5,
        })
        .unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }

    // ==================== Next Body Parsing Tests ====================

    #[test]
    fn test_next_body_empty_means_no_content() {
        assert!(parse_next_body("").unwrap().is_none());
        assert!(parse_next_body("  \n").unwrap().is_none());
        assert!(parse_next_body("null").unwrap().is_none());
    }

    #[test]
    fn test_next_body_object() {
        let tx = parse_next_body(r#"{"id": "tx-1", "amount": 12.5}"#)
            .unwrap()
            .unwrap();
        assert_eq!(tx.id(), Some("tx-1"));
        assert_eq!(tx.amount(), Some(12.5));
    }

    #[test]
    fn test_next_body_rejects_non_objects() {
        assert!(matches!(
            parse_next_body("[1, 2]"),
            Err(GatewayError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_next_body("\"tx\""),
            Err(GatewayError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_next_body("<html>"),
            Err(GatewayError::MalformedResponse { .. })
        ));
    }

    // ==================== Ingest Body Parsing Tests ====================

    #[test]
    fn test_ingest_body_full() {
        let body = json!({
            "transaction": {"id": "tx-9", "amount": 5000.0},
            "decision": {
                "id": "dec-1",
                "transaction_id": "tx-9",
                "risk_score": 82,
                "decision": "block",
                "created_at": "2026-01-01T00:00:00Z"
            },
            "case_id": "CASE-0001"
        });

        let result = parse_ingest_body(&body.to_string()).unwrap();
        assert_eq!(result.transaction_id.as_deref(), Some("tx-9"));
        assert!((result.risk_score - 82.0).abs() < f64::EPSILON);
        assert_eq!(result.decision, Decision::Block);
        assert_eq!(result.case_id.as_deref(), Some("CASE-0001"));
    }

    #[test]
    fn test_ingest_body_missing_fields_default() {
        let result = parse_ingest_body("{}").unwrap();
        assert_eq!(result, IngestionResult::default());
        assert_eq!(result.decision, Decision::Pending);
    }

    #[test]
    fn test_ingest_body_null_fields_default() {
        let body = json!({
            "transaction": null,
            "decision": {"risk_score": null, "decision": null},
            "case_id": null
        });
        let result = parse_ingest_body(&body.to_string()).unwrap();
        assert_eq!(result, IngestionResult::default());
    }

    #[test]
    fn test_ingest_body_empty_label_is_pending() {
        let body = json!({"decision": {"risk_score": 12.5, "decision": ""}});
        let result = parse_ingest_body(&body.to_string()).unwrap();
        assert_eq!(result.decision, Decision::Pending);
        assert!((result.risk_score - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_body_keeps_unrecognized_label() {
        let body = json!({"decision": {"risk_score": 40, "decision": "escalate"}});
        let result = parse_ingest_body(&body.to_string()).unwrap();
        assert_eq!(result.decision, Decision::Unrecognized("escalate".to_string()));
    }

    #[test]
    fn test_ingest_body_must_be_object() {
        assert!(matches!(
            parse_ingest_body("null"),
            Err(GatewayError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_ingest_body(""),
            Err(GatewayError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_ingest_body("[]"),
            Err(GatewayError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_json_kind_names() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!([])), "an array");
        assert_eq!(json_kind(&json!(1)), "a number");
    }
}
