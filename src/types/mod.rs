// src/types/mod.rs
use thiserror::Error;

mod domain_types;
pub mod flag;
mod ids;
mod window;

pub use domain_types::*;
pub use flag::Flag;
pub use ids::*;
pub use window::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid header name: {name} - {reason}")]
    InvalidHeaderName { name: String, reason: String },

    #[error("Invalid timestamp: {input} - expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339")]
    InvalidTimestamp { input: String },

    #[error("Empty window: {from} is not before {to}")]
    EmptyWindow { from: String, to: String },

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u64, min: u64, max: u64 },
}
