//! Error types for emitter operations.

use thiserror::Error;

/// Errors that can occur during emitter operations.
///
/// The hijack layer never raises errors of its own. Anything returned from a
/// hijacked emitter originates in the host and is passed through unchanged.
#[derive(Error, Debug)]
pub enum EmitterError {
    /// An `"error"` event was emitted with no listener attached.
    #[error("unhandled 'error' event: {0}")]
    UnhandledError(String),

    /// Configuration value could not be used.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for emitter operations.
pub type Result<T> = std::result::Result<T, EmitterError>;
