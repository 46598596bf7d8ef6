//! Error types for the fusion engine.
//!
//! The engine is best-effort by design: malformed or degenerate detections
//! are dropped with a warning rather than failing a whole fusion run, so
//! the only fatal errors are configuration problems raised at engine
//! construction time.

use thiserror::Error;

/// Errors that can occur in the fusion engine.
#[derive(Debug, Error)]
pub enum FusionError {
    /// Error indicating a configuration problem.
    ///
    /// Raised only when constructing an engine; a successfully constructed
    /// engine never fails a per-image call.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },
}

impl FusionError {
    /// Creates a configuration error with context and details.
    ///
    /// # Arguments
    ///
    /// * `context` - High-level description of what was being configured
    /// * `details` - Specific details about what went wrong
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Config {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error for invalid field values.
    ///
    /// # Arguments
    ///
    /// * `field` - The name of the field with an invalid value
    /// * `expected` - Description of what was expected
    /// * `actual` - Description of what was actually provided
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }
}
