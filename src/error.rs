// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names what went wrong and where. Whether a failure is fatal
//! is decided by the caller: upstream and single-record write failures are
//! absorbed by the page loop, while startup and configuration failures end
//! the run.

use crate::types::TimeWindow;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Search API returned HTTP {status}: {body_preview}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body_preview: String,
    },

    #[error("Search API flagged an error: {message}")]
    UpstreamFlagged { message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage task failed: {0}")]
    StorageTask(#[from] tokio::task::JoinError),

    #[error("Failed to encode order {order_id} for storage: {source}")]
    Encoding {
        order_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Abandoned window {window} at bisection depth {depth}")]
    WindowAbandoned { window: TimeWindow, depth: u32 },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Short category used when an upstream failure is downgraded to an empty page.
    pub fn upstream_category(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "transport",
            Self::UpstreamStatus { .. } => "http status",
            Self::UpstreamFlagged { .. } => "upstream flagged",
            Self::MalformedResponse(_) => "malformed response",
            _ => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_categories_distinguish_failure_sources() {
        let flagged = AppError::UpstreamFlagged {
            message: "invalid token".to_string(),
        };
        assert_eq!(flagged.upstream_category(), "upstream flagged");
        assert_eq!(
            flagged.to_string(),
            "Search API flagged an error: invalid token"
        );

        let malformed = AppError::MalformedResponse("expected array".to_string());
        assert_eq!(malformed.upstream_category(), "malformed response");

        let config = AppError::MissingConfiguration("ORDER_API_KEY".to_string());
        assert_eq!(config.upstream_category(), "other");
    }

    #[test]
    fn serde_errors_become_malformed_responses() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(app, AppError::MalformedResponse(_)));
    }
}
