//! Menagerie Demo
//!
//! Drives a menagerie store from the terminal:
//! - A subscriber logs every committed state
//! - A scripted opening session of counter, people and animal actions
//! - Periodic generators adding a person every 3 s and an animal every 5 s
//! - An optional journal export and replay audit at exit

mod config;
mod driver;
mod render;
mod rng;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::Config;
use driver::{scripted_session, Driver};
use menagerie_core::{Journal, JournalConfig, RootReducer, Store};
use menagerie_journal::{Auditor, ExportFormat, Exporter};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "menagerie-demo")]
#[command(about = "Drive a menagerie store with a scripted session and periodic generators", long_about = None)]
struct Cli {
    /// RON configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of generator ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Run ticks back to back instead of in real time
    #[arg(long)]
    fast: bool,

    /// Write the dispatch journal to this file at exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Journal export format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Ron,
    Json,
    Csv,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Ron => ExportFormat::Ron,
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
            Format::Text => ExportFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(ticks) = cli.ticks {
        config.run_ticks = ticks;
    }
    if cli.fast {
        config.realtime = false;
    }
    debug!(?config, "configuration loaded");

    let store = Store::new(RootReducer::new());

    if config.journal.enabled {
        store.attach_journal(Journal::with_config(JournalConfig {
            recording_enabled: true,
            snapshot_interval: config.journal.snapshot_interval,
            max_entries: config.journal.max_entries,
            ..Default::default()
        }));
    }

    let reader = store.clone();
    let logger = store.subscribe(move || {
        let state = reader.get_state();
        info!(seq = reader.dispatch_count(), %state, "state changed");
        debug!(?state);
    });

    info!(state = %store.get_state(), "initial state");

    for action in scripted_session() {
        store
            .dispatch(action)
            .context("Scripted dispatch failed")?;
    }

    store.record_metadata("phase", "generators");
    info!(
        ticks = config.run_ticks,
        tick_ms = config.tick_ms,
        realtime = config.realtime,
        "starting generators"
    );

    let mut driver = Driver::new(store.clone(), &config);
    let generated = driver
        .run(config.run_ticks, config.realtime)
        .context("Generator dispatch failed")?;
    info!(generated, total = store.dispatch_count(), "generators finished");
    logger.unsubscribe();

    println!("{}", render::render(&store.get_state()));

    if let Some(journal) = store.detach_journal() {
        let auditor = Auditor::new(&journal);
        println!("{}", auditor.generate_report());

        let replay = auditor.verify_replay(&RootReducer::new());
        if replay.is_consistent() {
            info!(segments = replay.checked_segments, "journal replay reproduced every snapshot");
        } else {
            warn!(mismatches = replay.mismatches.len(), "journal replay diverged");
        }

        if let Some(path) = &cli.export {
            let content = Exporter::new(&journal)
                .export(cli.format.into())
                .context("Failed to export journal")?;
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "journal exported");
        }
    } else if cli.export.is_some() {
        warn!("journal disabled in configuration; nothing to export");
    }

    Ok(())
}
