//! Error types for the backdrop.
//!
//! Nothing here is ever surfaced to the page: the wasm entry point logs these
//! and leaves the page untouched.

use thiserror::Error;

/// Rejected configuration override.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config field `{field}` out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failure to attach the backdrop to the host page.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("required element #{0} not found")]
    MissingElement(&'static str),

    #[error("element #{0} has the wrong type")]
    WrongElementType(&'static str),

    #[error("2d canvas context unavailable")]
    NoContext,

    #[error("browser API unavailable: {0}")]
    NoBrowserApi(&'static str),

    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T, E = BackdropError> = std::result::Result<T, E>;
