//! Stream command.
//!
//! Starts one run against the scoring service and prints every recorded cycle
//! until the run reaches a terminal condition. Ctrl+C requests a stop; the
//! in-flight cycle still completes before the summary is printed. A second
//! Ctrl+C abandons the in-flight cycle and exits immediately.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use fraudops_core::{classify, AppConfig, HistoryEntry, Severity, DEFAULT_CONFIG_PATH};
use fraudops_gateway::ScoringClient;
use fraudops_stream::{StreamController, StreamEvent, StreamStatus};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Arguments for the run command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Scoring service base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum cycles for this run (overrides config)
    #[arg(long)]
    pub max_cycles: Option<u32>,

    /// Delay between cycles in milliseconds (overrides config)
    #[arg(long)]
    pub pacing_ms: Option<u64>,
}

impl RunArgs {
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(max_cycles) = self.max_cycles {
            config.stream.max_cycles = max_cycles;
        }
        if let Some(pacing_ms) = self.pacing_ms {
            config.stream.pacing_ms = pacing_ms;
        }
        config
    }
}

/// What a Ctrl+C should do, given how many came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Ask the controller to stop at the next cycle boundary.
    Stop,
    /// Stop waiting for the in-flight cycle.
    Abort,
}

#[derive(Debug, Default)]
struct InterruptTracker {
    received: u32,
}

impl InterruptTracker {
    fn next(&mut self) -> Interrupt {
        self.received += 1;
        if self.received == 1 {
            Interrupt::Stop
        } else {
            Interrupt::Abort
        }
    }
}

/// Runs the stream command.
///
/// # Errors
/// Returns an error if configuration cannot be loaded, the HTTP client cannot
/// be built, or the run ends because a gateway call failed.
pub async fn run_stream(args: RunArgs) -> Result<()> {
    let config = args.apply_overrides(super::load_config(&args.config, args.base_url.as_deref())?);

    let client = ScoringClient::new(config.gateway.clone())
        .context("Failed to create scoring service client")?;
    let controller = StreamController::new(Arc::new(client), config.stream.clone());
    let mut events = controller.subscribe();

    println!(
        "Streaming from {} (max {} cycles, {} ms pacing)",
        config.gateway.base_url.bold(),
        config.stream.max_cycles,
        config.stream.pacing_ms
    );
    controller.start();

    let mut interrupts = InterruptTracker::default();
    let mut aborted = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(StreamEvent::CycleRecorded { cycle, entry, .. }) => {
                    println!("{}", render_cycle(cycle, &entry));
                }
                Ok(StreamEvent::RunStopped { .. }) | Err(RecvError::Closed) => break,
                Ok(StreamEvent::RunStarted { run_id, .. }) => {
                    tracing::debug!(run_id, "Run started");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Display fell behind, skipped {} events", skipped);
                }
            },
            _ = tokio::signal::ctrl_c() => match interrupts.next() {
                Interrupt::Stop => {
                    tracing::info!("Received Ctrl+C, stopping after current cycle (Ctrl+C again to abort)");
                    controller.stop();
                }
                Interrupt::Abort => {
                    tracing::warn!("Received second Ctrl+C, abandoning in-flight cycle");
                    aborted = true;
                    break;
                }
            },
        }
    }

    if aborted {
        print_summary(&controller.snapshot());
        return Err(anyhow!("Stream run aborted before the in-flight cycle finished"));
    }

    let status = controller.shutdown().await;
    print_summary(&status);

    match status.last_stop {
        Some(reason) if reason.is_failure() => Err(anyhow!("Stream run failed: {}", reason)),
        _ => Ok(()),
    }
}

/// Uncoloured single-line description of a recorded cycle.
fn describe_cycle(cycle: u32, entry: &HistoryEntry) -> String {
    format!(
        "[{:>3}] {:<8} {} user={} type={} amount={:.2} {} country={} score={:.1} decision={}",
        cycle,
        classify(&entry.decision).tag(),
        entry.id,
        entry.user_id,
        entry.transaction_type,
        entry.amount,
        entry.currency,
        entry.country,
        entry.risk_score,
        entry.decision
    )
}

fn render_cycle(cycle: u32, entry: &HistoryEntry) -> ColoredString {
    let line = describe_cycle(cycle, entry);
    match classify(&entry.decision) {
        Severity::Cleared => line.green(),
        Severity::Elevated => line.yellow(),
        Severity::Critical => line.red().bold(),
        Severity::Unknown => line.dimmed(),
    }
}

fn print_summary(status: &StreamStatus) {
    let stats = status.stats;
    let reason = status
        .last_stop
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);

    println!();
    println!("{}", "=== Run Summary ===".bold());
    println!("Run:       #{}", status.run_id);
    println!("Stopped:   {}", reason);
    println!("Processed: {}", stats.total);
    println!("Approved:  {}", stats.approve.to_string().green());
    println!("Review:    {}", stats.review.to_string().yellow());
    println!("Blocked:   {}", stats.block.to_string().red());
    if stats.uncategorized() > 0 {
        println!("Other:     {}", stats.uncategorized());
    }
}
