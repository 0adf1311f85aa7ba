use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a stream controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    /// Stop requested; the in-flight cycle is finishing.
    Stopping,
}

impl RunState {
    /// True while a run's loop task is alive.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The per-run cycle budget was used up.
    CycleBudgetExhausted,
    /// The queue reported nothing pending.
    QueueEmpty,
    /// Pulling the next transaction failed.
    FetchFailed(String),
    /// Submitting a pulled transaction failed; it was not recorded.
    SubmitFailed(String),
    /// `stop()` was observed at a cycle boundary.
    Cancelled,
}

impl StopReason {
    /// True when the run ended because a gateway call failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_) | Self::SubmitFailed(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleBudgetExhausted => f.write_str("cycle budget exhausted"),
            Self::QueueEmpty => f.write_str("queue empty"),
            Self::FetchFailed(e) => write!(f, "fetch failed: {e}"),
            Self::SubmitFailed(e) => write!(f, "submit failed: {e}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}
