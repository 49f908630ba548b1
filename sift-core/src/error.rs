//! Structured error types for the sift workspace.

use thiserror::Error;

/// Unified error type for all sift operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of observation input that is not exactly two real numbers.
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// No observations were supplied.
    #[error("empty input: at least one observation is required")]
    EmptyInput,

    /// Only one label class is present where both are needed.
    #[error("degenerate label set: {0}")]
    DegenerateLabels(String),

    /// A metric whose denominator is zero.
    #[error("undefined metric: {0}")]
    UndefinedMetric(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Chart rendering failure
    #[error("render error: {0}")]
    Render(String),

    /// Bad configuration value or file
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the sift workspace.
pub type Result<T> = std::result::Result<T, SiftError>;
