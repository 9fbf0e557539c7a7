// src/config.rs
use crate::constants::{
    DEFAULT_AUTH_HEADER, DEFAULT_DATABASE_PATH, DEFAULT_HISTORY_START,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_BISECTION_DEPTH,
};
use crate::error::AppError;
use crate::ingest::{DepthExhaustionPolicy, IngestSettings};
use crate::types::{parse_instant, ApiKey, AuthHeaderName, ValidatedUrl, ValidationError};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound accepted for `--max-depth`; a month halved 30 times is
/// already below a tenth of a second.
const MAX_DEPTH_LIMIT: u32 = 30;

/// Upper bound accepted for `--timeout`, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Base URL of the order search API (e.g. "https://api.example.com/v1")
    #[arg(long, env = "ORDER_API_BASE_URL")]
    pub base_url: String,

    /// Header that carries the API key
    #[arg(long, default_value = DEFAULT_AUTH_HEADER)]
    pub auth_header: String,

    /// SQLite database file receiving the orders
    #[arg(short, long, default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// First instant to backfill (YYYY-MM-DD or RFC 3339)
    #[arg(long, default_value = DEFAULT_HISTORY_START)]
    pub since: String,

    /// End of the backfill, exclusive (defaults to now)
    #[arg(long)]
    pub until: Option<String>,

    /// How many times a stuck window may be halved
    #[arg(long, default_value_t = MAX_BISECTION_DEPTH)]
    pub max_depth: u32,

    /// What to do with a window that is still stuck at the maximum depth
    #[arg(long, value_enum, default_value_t = DepthExhaustionPolicy::Log)]
    pub on_depth_exhausted: DepthExhaustionPolicy,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub base_url: ValidatedUrl,
    pub api_key: ApiKey,
    pub auth_header: AuthHeaderName,
    pub database: PathBuf,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub request_timeout: Duration,
    pub settings: IngestSettings,
    pub verbose: bool,
}

impl IngestConfig {
    /// Resolves a complete configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key = std::env::var("ORDER_API_KEY").map_err(|_| {
            AppError::MissingConfiguration("ORDER_API_KEY environment variable not set".to_string())
        })?;
        Self::from_parts(cli, &api_key, Utc::now())
    }

    /// Resolution with the credential and clock supplied by the caller.
    pub fn from_parts(
        cli: CommandLineInput,
        api_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;
        let base_url = ValidatedUrl::parse(&cli.base_url)?;
        let auth_header = AuthHeaderName::new(cli.auth_header)?;

        let since = parse_instant(&cli.since)?;
        let until = match cli.until.as_deref() {
            Some(until) => parse_instant(until)?,
            None => now,
        };
        if since >= until {
            return Err(ValidationError::EmptyWindow {
                from: cli.since,
                to: cli.until.unwrap_or_else(|| "now".to_string()),
            }
            .into());
        }

        if cli.max_depth > MAX_DEPTH_LIMIT {
            return Err(ValidationError::OutOfBounds {
                value: cli.max_depth.into(),
                min: 0,
                max: MAX_DEPTH_LIMIT.into(),
            }
            .into());
        }

        if !(1..=MAX_TIMEOUT_SECS).contains(&cli.timeout) {
            return Err(ValidationError::OutOfBounds {
                value: cli.timeout,
                min: 1,
                max: MAX_TIMEOUT_SECS,
            }
            .into());
        }

        Ok(IngestConfig {
            base_url,
            api_key,
            auth_header,
            database: cli.database,
            since,
            until,
            request_timeout: Duration::from_secs(cli.timeout),
            settings: IngestSettings {
                max_depth: cli.max_depth,
                on_depth_exhausted: cli.on_depth_exhausted,
                ..IngestSettings::default()
            },
            verbose: cli.verbose,
        })
    }
}
