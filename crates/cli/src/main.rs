use clap::{Parser, Subcommand};

mod commands;

use commands::{RunArgs, SeedArgs};

#[derive(Parser)]
#[command(name = "fraudops")]
#[command(about = "Stream pending transactions through the FraudOps scoring service", long_about = None)]
struct Cli {
    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull, score, and display transactions until the run stops
    Run(RunArgs),
    /// Refill the scoring service's pending queue with demo transactions
    Seed(SeedArgs),
}

fn init_logging(log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => {
            commands::run_stream(args).await?;
        }
        Commands::Seed(args) => {
            commands::run_seed(args).await?;
        }
    }

    Ok(())
}
