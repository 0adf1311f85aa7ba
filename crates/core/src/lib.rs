pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod config_loader;
pub mod types;

pub use aggregator::{AggregateSnapshot, RollingAggregator, DEFAULT_HISTORY_CAPACITY};
pub use classifier::{classify, classify_label, Severity};
pub use config::{AppConfig, GatewayConfig, StreamConfig, DEFAULT_BASE_URL};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use types::{Decision, HistoryEntry, IngestionResult, PendingTransaction, RunningStats};
