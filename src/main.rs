use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tontine::application::engine::TontineEngine;
use tontine::domain::config::TontineConfig;
use tontine::domain::ports::{Clock, TontineStoreBox};
use tontine::infrastructure::clock::ManualClock;
use tontine::infrastructure::in_memory::{InMemoryLedger, InMemoryTontineStore};
use tontine::interfaces::csv::command_reader::{Command, CommandReader};
use tontine::interfaces::csv::summary_writer::{Summary, SummaryWriter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Simulation script CSV file (`action, caller, value`)
    script: PathBuf,

    /// JSON file holding the tontine configuration
    #[arg(long, conflicts_with_all = ["dues", "interval", "min_players"])]
    config: Option<PathBuf>,

    /// Exact amount each participant must contribute
    #[arg(long, required_unless_present = "config")]
    dues: Option<u64>,

    /// Elimination window in seconds
    #[arg(long, required_unless_present = "config")]
    interval: Option<u64>,

    /// Enrollments needed to start the tontine
    #[arg(long, required_unless_present = "config")]
    min_players: Option<u32>,

    /// Keep enrollment open after the tontine has started
    #[arg(long)]
    allow_latecomers: bool,

    /// Initial reading of the simulated clock, in seconds. A resumed tontine
    /// continues from the later of this and its last recorded reading.
    #[arg(long, default_value_t = 0)]
    start_time: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

impl Cli {
    fn tontine_config(&self) -> Result<TontineConfig> {
        if let Some(path) = &self.config {
            let file = File::open(path).into_diagnostic()?;
            let config: TontineConfig = serde_json::from_reader(file).into_diagnostic()?;
            config.validate().into_diagnostic()?;
            return Ok(config);
        }

        match (self.dues, self.interval, self.min_players) {
            (Some(dues), Some(interval), Some(min_players)) => {
                TontineConfig::new(dues, interval, min_players, self.allow_latecomers)
                    .into_diagnostic()
            }
            _ => Err(miette::miette!(
                "--dues, --interval and --min-players are required without --config"
            )),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: &Path) -> Result<TontineStoreBox> {
    use tontine::infrastructure::rocksdb::RocksDBStore;

    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(_db_path: &Path) -> Result<TontineStoreBox> {
    warn!(
        "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryTontineStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let store: TontineStoreBox = match &cli.db_path {
        Some(db_path) => open_store(db_path)?,
        None => Box::new(InMemoryTontineStore::new()),
    };

    let clock = ManualClock::new(cli.start_time);
    let ledger = InMemoryLedger::new();

    let engine = if store.load().await.into_diagnostic()?.is_some() {
        TontineEngine::resume(Box::new(clock.clone()), Box::new(ledger.clone()), store)
            .await
            .into_diagnostic()?
    } else {
        let config = cli.tontine_config()?;
        TontineEngine::create(
            config,
            Box::new(clock.clone()),
            Box::new(ledger.clone()),
            store,
        )
        .await
        .into_diagnostic()?
    };

    let mut winner = None;
    let mut payout = None;

    let file = File::open(&cli.script).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(Command::Contribute { caller, amount }) => {
                if let Err(e) = engine.contribute(caller.clone(), amount).await {
                    warn!("Rejected contribution from {}: {}", caller, e);
                }
            }
            Ok(Command::Claim { caller }) => match engine.claim(caller.clone()).await {
                Ok(amount) => {
                    winner = Some(caller);
                    payout = Some(amount);
                }
                Err(e) => warn!("Rejected claim from {}: {}", caller, e),
            },
            Ok(Command::Advance { seconds }) => {
                clock.advance(seconds);
                info!(now = clock.now(), "clock advanced");
            }
            Err(e) => warn!("Error reading command: {}", e),
        }
    }

    engine.checkpoint().await.into_diagnostic()?;

    let summary = Summary {
        phase: engine.phase().await,
        balance: engine.balance().await,
        participants: engine.participants().await.len(),
        winner,
        payout,
    };

    let stdout = io::stdout();
    let mut writer = SummaryWriter::new(stdout.lock());
    writer.write_summary(&summary).into_diagnostic()?;

    Ok(())
}
