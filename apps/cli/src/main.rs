//! blobcast entry point: push local files to every configured
//! blob-storage destination.

mod config;
mod files;

use std::path::PathBuf;

use anyhow::Context;
use blobcast_remote::{HmacAuthorizer, HttpTransport};
use blobcast_sanitize::ExifSanitizer;
use blobcast_upload::{
    BatchEvent, BatchOptions, BatchOrchestrator, BlobCacheNotifier, DestinationSet, Selection,
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "blobcast",
    version,
    about = "Upload files to every configured blob-storage destination"
)]
struct Cli {
    /// Destination config file (TOML).
    #[arg(long, default_value = "destinations.toml")]
    config: PathBuf,

    /// Signing secret; falls back to the BLOBCAST_SECRET environment variable.
    #[arg(long)]
    secret: Option<String>,

    /// Keep embedded metadata (EXIF) instead of stripping it.
    #[arg(long)]
    keep_metadata: bool,

    /// Disable a destination by name for this run (repeatable).
    #[arg(long = "disable", value_name = "NAME")]
    disabled: Vec<String>,

    /// Files to upload.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Logs the per-destination refresh signal.
struct LogNotifier;

impl BlobCacheNotifier for LogNotifier {
    fn destination_refreshed(&self, destination: &str) {
        info!(destination = %destination, "blob listing refreshed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let secret = match cli.secret {
        Some(s) => s,
        None => std::env::var("BLOBCAST_SECRET")
            .context("no signing secret: pass --secret or set BLOBCAST_SECRET")?,
    };

    let destinations = config::DestinationsConfig::load(&cli.config)?.destinations;
    anyhow::ensure!(!destinations.is_empty(), "no destinations configured");

    let mut selection = Selection::new();
    selection.add(files::read_files(&cli.files)?);
    info!(
        files = selection.len(),
        destinations = destinations.len(),
        "starting batch"
    );

    let set = DestinationSet::new(destinations);
    for name in &cli.disabled {
        set.set_enabled(name, false);
    }

    let sanitizer = ExifSanitizer;
    let authorizer = HmacAuthorizer::new(secret.into_bytes());
    let transport = HttpTransport::default();
    let notifier = LogNotifier;

    let mut orchestrator = BatchOrchestrator::new(&sanitizer, &authorizer, &transport, &notifier);
    let mut events = orchestrator
        .take_events()
        .context("event receiver already taken")?;
    let progress = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                BatchEvent::Progress {
                    destination,
                    transferred,
                    size,
                } => println!("{destination}: {transferred}/{size} bytes"),
                BatchEvent::DestinationCompleted { destination } => {
                    println!("{destination}: done");
                }
                BatchEvent::DestinationFailed { destination, error } => {
                    println!("{destination}: failed ({error})");
                }
            }
        }
    });

    let options = BatchOptions {
        strip_metadata: !cli.keep_metadata,
    };
    let results = orchestrator.run(&mut selection, &set, &options).await;

    // Closing the orchestrator ends the event stream.
    drop(orchestrator);
    let _ = progress.await;

    let mut failed = false;
    for result in &results {
        match &result.error {
            None => {
                info!(
                    destination = %result.destination,
                    stored = result.stored.len(),
                    "destination pass succeeded"
                );
            }
            Some(err) => {
                failed = true;
                error!(destination = %result.destination, error = %err, "destination pass failed");
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
