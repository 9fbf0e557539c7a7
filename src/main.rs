// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use order_backfill::{
    format_instant, run_backfill, CommandLineInput, IngestConfig, IngestionReport,
    OrderSearchClient, SqliteOrderStore,
};
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("order_backfill.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Opens the collaborators and runs the backfill over the configured span.
async fn execute_backfill(config: &IngestConfig) -> anyhow::Result<IngestionReport> {
    let store = SqliteOrderStore::open(&config.database)
        .with_context(|| format!("opening order database {}", config.database.display()))?;
    let client = OrderSearchClient::new(
        &config.base_url,
        &config.api_key,
        &config.auth_header,
        config.request_timeout,
    )
    .context("building search API client")?;

    log::info!(
        "Backfilling orders created in [{}, {}) from {} into {}",
        format_instant(config.since),
        format_instant(config.until),
        config.base_url,
        config.database.display()
    );

    let report = run_backfill(
        &client,
        &store,
        &config.settings,
        config.since,
        config.until,
    )
    .await
    .context("backfill aborted")?;

    Ok(report)
}

/// Reports completion to the operator with stats and abandoned windows.
fn report_completion(report: &IngestionReport) {
    println!(
        "📦 {} new orders stored ({} known at start, {} known now).",
        report.orders_ingested, report.known_ids_at_start, report.known_ids_at_end
    );
    println!(
        "   {} months, {} window drains, {} bisections, {} pages.",
        report.windows_scheduled, report.windows_drained, report.bisections, report.pages_fetched
    );
    if let Some(stored) = report.stored_orders {
        println!("   {} orders in storage.", stored);
    }

    if report.upstream_failures > 0 {
        eprintln!(
            "⚠️  {} search requests failed and were treated as empty pages.",
            report.upstream_failures
        );
    }
    if report.sink_failures > 0 {
        eprintln!(
            "⚠️  {} orders could not be stored; re-run to retry them.",
            report.sink_failures
        );
    }
    for abandoned in &report.abandoned {
        eprintln!(
            "⚠️  Abandoned {} at depth {} ({}). Orders in it may be missing.",
            abandoned.window, abandoned.depth, abandoned.reason
        );
    }

    if report.is_complete() {
        println!("✓ Backfill complete.");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("failed to set up logging: {}", e))?;

    let config = IngestConfig::resolve(cli).context("invalid configuration")?;

    let report = execute_backfill(&config).await?;
    report_completion(&report);

    Ok(())
}
