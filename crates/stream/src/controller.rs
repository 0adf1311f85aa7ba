use crate::events::{StreamEvent, StreamStatus};
use crate::run_state::{RunState, StopReason};
use chrono::{DateTime, Utc};
use fraudops_core::{RollingAggregator, StreamConfig};
use fraudops_gateway::TransactionGateway;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// State mutated by `start`/`stop` and the cycle loop, always under one lock.
struct Shared {
    run_state: RunState,
    run_id: u64,
    cycles_completed: u32,
    aggregator: RollingAggregator,
    started_at: Option<DateTime<Utc>>,
    last_stop: Option<StopReason>,
    /// Wakes the current run out of its pacing wait when a stop arrives.
    stop_signal: Arc<Notify>,
}

struct Inner {
    gateway: Arc<dyn TransactionGateway>,
    config: StreamConfig,
    shared: Mutex<Shared>,
    event_tx: broadcast::Sender<StreamEvent>,
    state_tx: watch::Sender<RunState>,
}

/// Drives paced pull → submit → record cycles against a scoring gateway.
///
/// One controller runs at most one stream at a time. `start` and `stop` are
/// synchronous and return immediately; the cycle loop runs as a Tokio task
/// and observes a stop request only between cycles, so a pull/submit pair
/// that is already in flight always completes and is recorded.
pub struct StreamController {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StreamController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(gateway: Arc<dyn TransactionGateway>, config: StreamConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(RunState::Idle);

        let shared = Shared {
            run_state: RunState::Idle,
            run_id: 0,
            cycles_completed: 0,
            aggregator: RollingAggregator::new(config.history_capacity),
            started_at: None,
            last_stop: None,
            stop_signal: Arc::new(Notify::new()),
        };

        Self {
            inner: Arc::new(Inner {
                gateway,
                config,
                shared: Mutex::new(shared),
                event_tx,
                state_tx,
            }),
            task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    /// Starts a fresh run.
    ///
    /// Returns `false` without touching any state unless the controller is
    /// idle. Otherwise resets stats and history, spawns the cycle loop, and
    /// returns `true`.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self) -> bool {
        let (run_id, stop_signal) = {
            let mut shared = self.inner.shared.lock();
            if shared.run_state != RunState::Idle {
                tracing::warn!(
                    "Stream run {} in invalid state for start (state: {:?}), ignoring",
                    shared.run_id,
                    shared.run_state
                );
                return false;
            }

            let started_at = Utc::now();
            shared.aggregator.reset();
            shared.run_id += 1;
            shared.cycles_completed = 0;
            shared.started_at = Some(started_at);
            shared.last_stop = None;
            shared.stop_signal = Arc::new(Notify::new());
            shared.run_state = RunState::Running;

            self.inner.state_tx.send_replace(RunState::Running);
            let _ = self.inner.event_tx.send(StreamEvent::RunStarted {
                run_id: shared.run_id,
                started_at,
            });

            (shared.run_id, Arc::clone(&shared.stop_signal))
        };

        tracing::info!(
            run_id,
            max_cycles = self.inner.config.max_cycles,
            pacing_ms = self.inner.config.pacing_ms,
            "Stream run started"
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let reason = inner.drive(run_id, &stop_signal).await;
            inner.finish(run_id, reason);
        });
        *self.task.lock() = Some(handle);

        true
    }

    /// Requests a cooperative stop of the current run.
    ///
    /// Returns `true` only on the Running → Stopping transition; calling it
    /// while idle or already stopping does nothing.
    pub fn stop(&self) -> bool {
        let mut shared = self.inner.shared.lock();
        if shared.run_state != RunState::Running {
            tracing::debug!(
                "Stream not running (state: {:?}), ignoring stop",
                shared.run_state
            );
            return false;
        }

        shared.run_state = RunState::Stopping;
        shared.stop_signal.notify_one();
        self.inner.state_tx.send_replace(RunState::Stopping);

        tracing::info!(
            run_id = shared.run_id,
            "Stream stop requested, finishing current cycle"
        );
        true
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.inner.shared.lock().run_state
    }

    /// Copies the current state, stats, and history under a single lock.
    #[must_use]
    pub fn snapshot(&self) -> StreamStatus {
        let shared = self.inner.shared.lock();
        let aggregate = shared.aggregator.snapshot();

        StreamStatus {
            state: shared.run_state,
            run_id: shared.run_id,
            cycles_completed: shared.cycles_completed,
            stats: aggregate.stats,
            history: aggregate.history,
            started_at: shared.started_at,
            last_stop: shared.last_stop.clone(),
        }
    }

    /// Subscribes to run lifecycle and per-cycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Watches state transitions.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<RunState> {
        self.inner.state_tx.subscribe()
    }

    /// Waits until no run is active and returns the final status.
    pub async fn wait_until_idle(&self) -> StreamStatus {
        let mut rx = self.inner.state_tx.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = rx.wait_for(|state| *state == RunState::Idle).await;
        self.snapshot()
    }

    /// Stops any active run and waits for its loop task to exit.
    pub async fn shutdown(&self) -> StreamStatus {
        self.stop();

        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("Stream loop task failed: {}", e);
            }
        }

        self.snapshot()
    }
}

impl Drop for StreamController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    /// Runs cycles until a terminal condition and returns why it stopped.
    async fn drive(&self, run_id: u64, stop_signal: &Notify) -> StopReason {
        let mut cycle: u32 = 0;

        loop {
            if self.shared.lock().run_state != RunState::Running {
                return StopReason::Cancelled;
            }
            if cycle >= self.config.max_cycles {
                return StopReason::CycleBudgetExhausted;
            }

            let tx = match self.gateway.fetch_next().await {
                Ok(Some(tx)) => tx,
                Ok(None) => {
                    tracing::info!(run_id, cycle, "No more pending transactions");
                    return StopReason::QueueEmpty;
                }
                Err(e) => {
                    tracing::warn!(run_id, cycle, "Failed to fetch next transaction: {}", e);
                    return StopReason::FetchFailed(e.to_string());
                }
            };

            let result = match self.gateway.submit(&tx).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(
                        run_id,
                        cycle,
                        transaction_id = tx.id().unwrap_or("unknown"),
                        "Failed to ingest transaction: {}",
                        e
                    );
                    return StopReason::SubmitFailed(e.to_string());
                }
            };

            cycle += 1;
            {
                let mut shared = self.shared.lock();
                let entry = shared.aggregator.record(&tx, &result).clone();
                shared.cycles_completed = cycle;
                let stats = shared.aggregator.stats();

                tracing::debug!(
                    run_id,
                    cycle,
                    transaction_id = %entry.id,
                    risk_score = entry.risk_score,
                    decision = %entry.decision,
                    "Transaction processed"
                );

                let _ = self.event_tx.send(StreamEvent::CycleRecorded {
                    run_id,
                    cycle,
                    entry,
                    stats,
                });
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.pacing()) => {}
                () = stop_signal.notified() => {}
            }
        }
    }

    fn finish(&self, run_id: u64, reason: StopReason) {
        let mut shared = self.shared.lock();
        shared.run_state = RunState::Idle;
        shared.last_stop = Some(reason.clone());
        let cycles = shared.cycles_completed;
        let stats = shared.aggregator.stats();

        self.state_tx.send_replace(RunState::Idle);
        let _ = self.event_tx.send(StreamEvent::RunStopped {
            run_id,
            reason: reason.clone(),
            cycles,
            stats,
        });

        if reason.is_failure() {
            tracing::warn!(run_id, cycles, total = stats.total, "Stream run stopped: {}", reason);
        } else {
            tracing::info!(run_id, cycles, total = stats.total, "Stream run stopped: {}", reason);
        }
    }
}
