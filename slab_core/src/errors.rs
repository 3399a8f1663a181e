//! # Error Types
//!
//! Structured error types for slab_core. Every failure carries enough context
//! (field, path, operation) for a caller to report it without re-parsing a
//! message string.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::errors::{SlabError, SlabResult};
//!
//! fn validate_width(width_m: f64) -> SlabResult<()> {
//!     if width_m <= 0.0 {
//!         return Err(SlabError::invalid_input(
//!             "width",
//!             width_m.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for slab_core operations
pub type SlabResult<T> = Result<T, SlabError>;

/// Structured error type for estimation and reporting.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SlabError {
    /// An input value is invalid (empty room list, non-positive dimension, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The quotation document could not be compiled or exported
    #[error("Render failed: {stage} - {reason}")]
    RenderFailed { stage: String, reason: String },
}

impl SlabError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SlabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SlabError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        SlabError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self, SlabError::InvalidInput { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SlabError::InvalidInput { .. } => "INVALID_INPUT",
            SlabError::FileError { .. } => "FILE_ERROR",
            SlabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SlabError::RenderFailed { .. } => "RENDER_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SlabError::invalid_input("rooms[0].width", "-3", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: SlabError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SlabError::invalid_input("rooms", "[]", "empty").error_code(), "INVALID_INPUT");
        assert_eq!(SlabError::render_failed("compile", "bad").error_code(), "RENDER_FAILED");
        assert_eq!(
            SlabError::file_error("write", "/tmp/x.pdf", "disk full").error_code(),
            "FILE_ERROR"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(SlabError::invalid_input("rooms", "[]", "empty").is_input_error());
        assert!(!SlabError::file_error("write", "x", "y").is_input_error());
        assert!(!SlabError::render_failed("pdf export", "z").is_input_error());
    }

    #[test]
    fn test_display_message() {
        let error = SlabError::file_error("rename to final", "/out/q.pdf", "permission denied");
        assert_eq!(
            error.to_string(),
            "File error: rename to final on '/out/q.pdf' - permission denied"
        );
    }
}
