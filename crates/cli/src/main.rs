//! `loggenie` — binary entry point.
//!
//! Run sequence:
//! 1. Load `.env` and parse command-line flags.
//! 2. Load environment [`Settings`] and initialise tracing.
//! 3. Merge flags over settings into validated [`RunOptions`].
//! 4. Resolve key material — misconfiguration aborts before any fetching.
//! 5. Fetch records from a file or the search backend and normalize them.
//! 6. Decrypt the batch with per-record failure isolation.
//! 7. Render to the requested format, to stdout or a file.

mod cli;
mod config;
mod render;
mod search;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use tracing::warn;

use loggenie_core::batch::{decrypt_batch, summarize};
use loggenie_core::crypto::{KeyMaterial, KeyProvenance};
use loggenie_core::ingest;

use cli::Cli;
use config::{RunOptions, Settings, Source};
use search::SearchClient;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Environment + flags
    // -----------------------------------------------------------------------
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&settings.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Validated options
    // -----------------------------------------------------------------------
    let opts = RunOptions::merge(cli, settings)?;

    // -----------------------------------------------------------------------
    // 4. Key material — fatal before any batch processing starts
    // -----------------------------------------------------------------------
    let key = KeyMaterial::resolve(&opts.key, opts.family)?;
    if key.provenance() == KeyProvenance::Passphrase {
        warn!(
            algorithm = %opts.family,
            "key resolved as a passphrase via a single unsalted SHA-256 digest; \
             this is weak key derivation — prefer a full-length hex or base64 key"
        );
    }

    // -----------------------------------------------------------------------
    // 5. Fetch and normalize records
    // -----------------------------------------------------------------------
    let mut records = match &opts.source {
        Source::File(path) => {
            status(&format!("Reading logs from file: {}", path.display()));
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ingest::normalize_text(&content)
        }
        Source::Backend { url, auth } => {
            status("Connecting to Elasticsearch/Kibana...");
            let client = SearchClient::new(url, auth.clone())?;
            status(&format!("Fetching logs from index '{}'...", opts.index));
            if opts.scroll {
                let hits = client
                    .fetch_scroll(&opts.index, opts.query.as_ref(), opts.size)
                    .await?;
                ingest::normalize_value(Value::Array(hits))
            } else {
                let envelope = client
                    .fetch(&opts.index, opts.query.as_ref(), opts.size)
                    .await?;
                ingest::normalize_value(envelope)
            }
        }
    };
    success(&format!("Fetched {} log entries", records.len()));

    if records.is_empty() {
        caution("No logs found");
        return Ok(());
    }

    // -----------------------------------------------------------------------
    // 6. Decrypt
    // -----------------------------------------------------------------------
    status("Decrypting logs...");
    decrypt_batch(&mut records, &opts.field, &key, opts.family);

    let summary = summarize(&records);
    success(&format!(
        "Successfully decrypted {} of {} logs",
        summary.succeeded, summary.attempted
    ));
    if summary.failed > 0 {
        caution(&format!("Failed to decrypt {} logs", summary.failed));
    }
    if summary.missing_field > 0 {
        caution(&format!(
            "{} logs had no '{}' field",
            summary.missing_field, opts.field
        ));
    }

    // -----------------------------------------------------------------------
    // 7. Render
    // -----------------------------------------------------------------------
    let rendered = render::render(&records, &opts.field, opts.format);
    match &opts.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            success(&format!("Decrypted logs saved to {}", path.display()));
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

// Progress lines go to stderr so stdout stays pipeable.
fn status(msg: &str) {
    eprintln!("{}", msg.cyan());
}

fn success(msg: &str) {
    eprintln!("{}", msg.green());
}

fn caution(msg: &str) {
    eprintln!("{}", msg.yellow());
}
