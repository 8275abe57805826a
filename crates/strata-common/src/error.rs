//! Strata Error - Unified Error Types
//!
//! Error handling shared by the time step model, the aggregation core and
//! the batch driver. Aggregation is a pure computation, so nothing here is
//! ever worth retrying; errors are classified instead as user errors
//! (bad configuration or input files) versus system errors.
//!
//! @version 0.1.0
//! @author Strata Development Team

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all Strata operations.
#[derive(Error, Debug)]
pub enum StrataError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid time step: {0}")]
    InvalidTimeStep(String),

    // Calendar errors
    #[error("calendar arithmetic out of range: {0}")]
    Calendar(String),

    // Series errors
    #[error("out of order: {0}")]
    OutOfOrder(String),

    // Input errors
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Provenance wrapper added by file-processing collaborators
    #[error("error while processing {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: Box<StrataError>,
    },
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;

// =============================================================================
// Error Classification
// =============================================================================

impl StrataError {
    /// Wrap an error with the path of the file being processed.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        StrataError::Source {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if the operation can be safely retried.
    ///
    /// Aggregation is deterministic: running it again on the same input
    /// reproduces the same failure.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        match self {
            StrataError::Configuration(_)
            | StrataError::InvalidTimeStep(_)
            | StrataError::OutOfOrder(_)
            | StrataError::Parse { .. } => true,
            StrataError::Source { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StrataError::Parse {
            line: 7,
            message: "bad timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at line 7: bad timestamp");
    }

    #[test]
    fn test_with_path_keeps_message() {
        let err = StrataError::Configuration("missing nominal offset".to_string())
            .with_path("/data/rain.hts");
        let text = err.to_string();
        assert!(text.contains("/data/rain.hts"));
        assert!(text.contains("missing nominal offset"));
    }

    #[test]
    fn test_classification() {
        let config = StrataError::InvalidTimeStep("0,0".to_string());
        assert!(config.is_user_error());
        assert!(!config.is_retryable());

        let io = StrataError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!io.is_user_error());
        assert!(!io.is_retryable());

        let wrapped = StrataError::OutOfOrder("x".to_string()).with_path("a");
        assert!(wrapped.is_user_error());
    }
}
