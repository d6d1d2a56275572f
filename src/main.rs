//! # news_tagger
//!
//! Download a small multi-country news corpus and tag it with a keyword
//! taxonomy.
//!
//! ## Usage
//!
//! ```sh
//! news_tagger download --api-key YOUR_KEY --countries us,mx --per-country 2
//! news_tagger tag --data ./data --out ./output
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline:
//! 1. **Fetching**: page through the NewsData.io API per country, deduplicate,
//!    write one text file per article
//! 2. **Tagging**: read the files, classify them against the taxonomy and
//!    extract frequent words, dates, entities and locations
//! 3. **Output**: write `report-<ts>.json`, `report-<ts>.csv` and
//!    `summary-<ts>.csv`

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod article;
mod cli;
mod dedup;
mod error;
mod fetcher;
mod models;
mod outputs;
mod tagger;
mod taxonomy;
mod utils;

use api::NewsDataClient;
use cli::{Cli, Command, DownloadArgs, TagArgs};
use taxonomy::Taxonomy;
use utils::{ensure_writable_dir, list_text_files, run_timestamp};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_tagger starting up");

    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    match args.command {
        Command::Download(args) => download(args).await?,
        Command::Tag(args) => tag(args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(out = %args.out.display()))]
async fn download(args: DownloadArgs) -> Result<(), Box<dyn Error>> {
    if let Err(e) = ensure_writable_dir(&args.out).await {
        error!(error = %e, "Data directory is not writable (fix perms or choose a different path)");
        return Err(e.into());
    }

    let plan = args.plan();
    if plan.countries.is_empty() {
        warn!("No countries given; nothing to download");
        return Ok(());
    }

    let client = NewsDataClient::new(&args.api_url, &args.api_key, args.timeout())?;
    let written = fetcher::download(&client, &plan, &args.out).await?;
    info!(total_written = written, "Download finished");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(data = %args.data.display(), out = %args.out.display()))]
async fn tag(args: TagArgs) -> Result<(), Box<dyn Error>> {
    if let Err(e) = ensure_writable_dir(&args.out).await {
        error!(error = %e, "Output directory is not writable (fix perms or choose a different path)");
        return Err(e.into());
    }

    let taxonomy = match &args.taxonomy {
        Some(path) => Taxonomy::load(path).await?,
        None => Taxonomy::builtin(),
    };

    let files = list_text_files(&args.data).await?;
    if files.is_empty() {
        warn!("No .txt files found");
        return Ok(());
    }

    let options = args.options();
    let rows = tagger::tag_files(&files, &taxonomy, &options).await;
    let summary = outputs::summarize(&rows, &taxonomy);
    let paths = outputs::write_reports(&rows, &summary, &args.out, &run_timestamp(Local::now())).await?;

    info!(
        articles = rows.len(),
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        summary = %paths.summary.display(),
        "Processed articles"
    );
    Ok(())
}
