use crate::error::Result;
use async_trait::async_trait;
use fraudops_core::{IngestionResult, PendingTransaction};

/// The two remote calls a streaming run depends on.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Pulls the next pending transaction; `Ok(None)` means the queue is empty.
    async fn fetch_next(&self) -> Result<Option<PendingTransaction>>;

    /// Submits a transaction for scoring and returns the service's verdict.
    async fn submit(&self, tx: &PendingTransaction) -> Result<IngestionResult>;
}
