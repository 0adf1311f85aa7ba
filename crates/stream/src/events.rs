use crate::run_state::{RunState, StopReason};
use chrono::{DateTime, Utc};
use fraudops_core::{HistoryEntry, RunningStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    /// Stats and history were reset and the loop was spawned.
    RunStarted {
        run_id: u64,
        started_at: DateTime<Utc>,
    },

    /// One transaction was pulled, scored, and recorded.
    CycleRecorded {
        run_id: u64,
        cycle: u32,
        entry: HistoryEntry,
        stats: RunningStats,
    },

    /// The run reached a terminal condition and the controller is idle again.
    RunStopped {
        run_id: u64,
        reason: StopReason,
        cycles: u32,
        stats: RunningStats,
    },
}

impl StreamEvent {
    #[must_use]
    pub const fn run_id(&self) -> u64 {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::CycleRecorded { run_id, .. }
            | Self::RunStopped { run_id, .. } => *run_id,
        }
    }
}

/// Consistent point-in-time view of a controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamStatus {
    pub state: RunState,
    /// Zero until the first run starts.
    pub run_id: u64,
    pub cycles_completed: u32,
    pub stats: RunningStats,
    /// Most recent first.
    pub history: Vec<HistoryEntry>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_stop: Option<StopReason>,
}
