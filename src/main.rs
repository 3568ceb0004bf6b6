// 🧾 fin-intel CLI
//
// JSON reports go to stdout; logs go to stderr (RUST_LOG overrides the
// default `info` level).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fin_intel::{analyze_distribution, load_snapshot, load_transactions_csv, Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "fin-intel", version, about = "Financial intelligence engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every analyzer over a snapshot and print the report
    Analyze {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,

        /// Transactions CSV, replaces the snapshot's transactions
        #[arg(long)]
        transactions: Option<PathBuf>,

        /// Engine config JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// First-digit distribution test over a transactions CSV
    Benford {
        #[arg(long)]
        csv: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            snapshot,
            transactions,
            config,
            pretty,
        } => run_analyze(snapshot, transactions, config, pretty),
        Command::Benford { csv } => run_benford(csv),
    }
}

fn run_analyze(
    snapshot_path: PathBuf,
    transactions_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config).context("Invalid engine configuration")?;

    let mut snapshot = load_snapshot(&snapshot_path)?;
    if let Some(path) = transactions_path {
        snapshot.transactions = load_transactions_csv(&path)?;
        info!(count = snapshot.transactions.len(), "transactions replaced from CSV");
    }

    let report = engine.analyze(&snapshot).context("Analysis failed")?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

fn run_benford(csv_path: PathBuf) -> Result<()> {
    let transactions = load_transactions_csv(&csv_path)?;
    let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();

    let result = analyze_distribution(&amounts);
    info!(chi_square = result.chi_square, risk = ?result.risk_level, "distribution analyzed");

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
