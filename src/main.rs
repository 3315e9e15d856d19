//! Prayer Texter - text-message prayer relay
//!
//! "Pray for one another" - James 5:16

use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prayertexter::{
    config::{Args, LogFormat},
    db::MemoryStore,
    services::{LogSender, UuidGenerator},
    types::TextMessage,
    Outcome, Relay,
};

/// Running totals for one stdin session
#[derive(Debug, Default)]
struct Tally {
    handled: usize,
    duplicates: usize,
    failed: usize,
    malformed: usize,
}

impl Tally {
    fn record(&mut self, joined: Result<Option<Outcome>, tokio::task::JoinError>) {
        match joined {
            Ok(Some(Outcome::Handled(_))) => self.handled += 1,
            Ok(Some(Outcome::Duplicate)) => self.duplicates += 1,
            Ok(None) => self.failed += 1,
            Err(e) => {
                error!("message task panicked: {}", e);
                self.failed += 1;
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging; stdout is left alone, stdin carries messages
    let log_level = args.log_level.clone();
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("prayertexter={},info", log_level).into()),
    );
    match args.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let scanner = match args.scanner() {
        Ok(scanner) => scanner,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("======================================");
    info!("  Prayer Texter");
    info!("  \"Pray for one another\"");
    info!("======================================");
    info!("Workers: {}", args.worker_count);
    info!("Intercessors per prayer: {}", args.intercessors_per_prayer);
    info!("State retention: {}h", args.state_retention_hours);
    match &args.profanity_list {
        Some(path) => info!("Profanity list: {} ({} words)", path.display(), scanner.len()),
        None => info!("Profanity list: built-in ({} words)", scanner.len()),
    }
    info!("Store: in-memory (records are lost on exit)");
    info!("======================================");

    let relay = Arc::new(Relay::new(
        Arc::new(MemoryStore::new()),
        Arc::new(LogSender),
        Arc::new(scanner),
        Arc::new(UuidGenerator),
        args.relay_config(),
    ));

    let semaphore = Arc::new(Semaphore::new(args.worker_count));
    let mut tasks: JoinSet<Option<Outcome>> = JoinSet::new();
    let mut tally = Tally::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: TextMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping malformed message: {}", e);
                tally.malformed += 1;
                continue;
            }
        };

        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let relay = Arc::clone(&relay);
        tasks.spawn(async move {
            let _permit = permit;
            let id = message.request_id.clone();
            match relay.handle(message).await {
                Ok(outcome) => {
                    debug!(id = %id, ?outcome, "message done");
                    Some(outcome)
                }
                Err(e) => {
                    error!(id = %id, retryable = e.is_retryable(), "message failed: {}", e);
                    None
                }
            }
        });

        while let Some(joined) = tasks.try_join_next() {
            tally.record(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        tally.record(joined);
    }

    info!(
        handled = tally.handled,
        duplicates = tally.duplicates,
        malformed = tally.malformed,
        failed = tally.failed,
        "Input closed, shutting down"
    );
    Ok(())
}
