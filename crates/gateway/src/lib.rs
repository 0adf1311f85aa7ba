//! HTTP adapter between the stream controller and the FraudOps scoring service.
//!
//! This crate provides:
//! - `TransactionGateway`, the two-call contract a streaming run depends on
//! - `ScoringClient`, a reqwest implementation of it
//! - `GatewayError`, the typed failure every call reports
//!
//! # API Endpoints
//!
//! - `GET /transactions/next` - Pull one pending transaction (204 or `null` when empty)
//! - `POST /transactions/ingest` - Store and score a transaction
//! - `POST /transactions/seed` - Regenerate the synthetic queue (operator tooling)

pub mod client;
pub mod error;
pub mod traits;

pub use client::{ScoringClient, SeedReport, INGEST_PATH, NEXT_PATH, SEED_PATH};
pub use error::{GatewayError, Result};
pub use traits::TransactionGateway;
