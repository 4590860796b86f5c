//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The SVG text could not be parsed.
    ///
    /// Absent input is a silent no-op; present-but-unparsable input is
    /// reported to the caller rather than swallowed.
    #[error("SVG parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    /// A `transform` attribute could not be parsed.
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
