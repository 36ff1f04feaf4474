//! UploadSleuth: how and when did objects land under this storage path?
//!
//! Thin binary entry point. All logic lives in the `uploadsleuth-core`
//! and `uploadsleuth-chart` crates; this file wires the stages together
//! and reports which one failed.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use uploadsleuth_chart::ChartOptions;
use uploadsleuth_core::cache::{self, CacheDecision};
use uploadsleuth_core::config::{RunConfig, StorageRoot};
use uploadsleuth_core::model::TimestampStore;
use uploadsleuth_core::scanner::progress::ScanProgress;
use uploadsleuth_core::scanner::{self, S3Listing};
use uploadsleuth_core::{analysis, snapshot, Stage};

/// Attach the failing stage to a core error.
fn staged(err: uploadsleuth_core::Error) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{stage} stage failed"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = cli.command.to_config().map_err(staged)?;
    let start = Instant::now();

    let store = match &cli.command {
        Command::Scan(args) => {
            let root = config
                .storage_root
                .clone()
                .context("scan mode requires a storage root")?;
            obtain_store(&config, root, args.region.clone())?
        }
        Command::Visualize(_) => snapshot::load(&config.snapshot_path()).map_err(staged)?,
    };

    match store.time_span() {
        Some((earliest, latest)) => tracing::info!(
            stage = %Stage::Aggregate,
            entries = store.len(),
            "Aggregating objects modified between {earliest} and {latest}"
        ),
        None => tracing::info!(stage = %Stage::Aggregate, "Aggregating an empty listing"),
    }
    let series = analysis::aggregate(&store, &config.frequency).map_err(staged)?;
    if let Some((first, end)) = series.range() {
        tracing::info!(
            buckets = series.len(),
            "Chart covers {first} to {end} in {} minute intervals",
            series.bucket_width().num_minutes()
        );
    }
    match series.peak() {
        Some(peak) => tracing::info!(
            buckets = series.len(),
            retained = series.total(),
            "Busiest interval starts {} with {} uploads",
            peak.start,
            peak.count
        ),
        None => tracing::warn!("No objects were modified inside the recency window"),
    }

    let options = ChartOptions {
        title: format!("{} upload frequency", config.label),
        width: config.image_size.0,
        height: config.image_size.1,
    };
    uploadsleuth_chart::render(&series, config.chart_format, &config.chart_path(), &options)
        .context("render stage failed")?;

    tracing::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

/// Run the cache gate, scanning `root` only on a miss or override.
fn obtain_store(
    config: &RunConfig,
    root: StorageRoot,
    region: Option<String>,
) -> anyhow::Result<TimestampStore> {
    let (store, decision) = cache::load_or_scan(&config.snapshot_path(), config.override_cache, || {
        let mut listing = S3Listing::connect(root, region)?;
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Iterating over S3 API response pages");

        let result = scanner::scan(&mut listing, |progress| match progress {
            ScanProgress::Page { pages, records, .. } => {
                spinner.set_message(format!("{pages} pages, {records} objects listed"));
                spinner.tick();
            }
            ScanProgress::Complete { .. } => spinner.finish_and_clear(),
        });
        if result.is_err() {
            spinner.abandon();
        }
        result
    })
    .map_err(staged)?;

    if decision == CacheDecision::Reuse {
        tracing::info!("Pass --override-cache to list the storage path again");
    }
    Ok(store)
}
