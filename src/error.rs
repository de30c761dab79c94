//! Persistence error types.
//!
//! The simulation itself never fails; only the stores that load and save
//! tuning, settings and high scores surface errors, and their callers
//! generally log them and fall back to defaults.

use std::fmt;

/// Errors raised by a [`crate::persistence::Store`] or while (de)serializing
/// the values kept in one.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(std::io::Error),

    /// The stored document is not valid JSON for the requested type.
    Json(serde_json::Error),

    /// The backing medium cannot be reached (e.g. `localStorage` disabled).
    Unavailable {
        /// Human-readable description of what was missing.
        context: &'static str,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store i/o failed: {}", e),
            StoreError::Json(e) => write!(f, "stored value is not valid JSON: {}", e),
            StoreError::Unavailable { context } => write!(f, "store unavailable: {}", context),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::Unavailable { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Convenience alias: a `Result` using `StoreError` as the error type.
pub type StoreResult<T> = Result<T, StoreError>;
