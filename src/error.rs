//!
//! Error handling for the toolbridge request translator.
//!
//! Defines all error types used throughout the crate using thiserror.
//! Whole-document failures surface as errors; per-item anomalies inside a
//! request are absorbed by the translator and never reach this type.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use thiserror::Error;

/* --- types ----------------------------------------------------------------------------------- */

///
/// Application error types.
///
/// Covers configuration, transport and translation failures.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Unresolved tool call id '{0}': no earlier tool call registered this id")]
    UnresolvedToolCall(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/* --- start of code -------------------------------------------------------------------------- */

impl BridgeError {
    /// True for errors caused by the caller's request rather than by this process
    pub fn is_client_error(&self) -> bool {
        matches!(self, BridgeError::MalformedRequest(_) | BridgeError::UnresolvedToolCall(_))
    }
}

/// Result type alias for cleaner error handling throughout the application
pub type Result<T> = std::result::Result<T, BridgeError>;
