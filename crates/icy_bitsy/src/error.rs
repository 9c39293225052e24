//! Error types for bitsyfont conversion

use thiserror::Error;

/// Main error type for icy_bitsy operations
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The cancellation token was armed when a checkpoint was reached.
    /// Any partial output must be discarded.
    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Font size must be a positive number of pixels, got {size}")]
    InvalidFontSize { size: u32 },

    #[error("Failed to parse font: {message}")]
    FontParse { message: String },

    #[error("Invalid bitsyfont at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Conversion task failed: {message}")]
    TaskFailed { message: String },

    // === External Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    #[error("{0}")]
    Generic(String),
}

/// Result type alias for icy_bitsy operations
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Create a bitsyfont parse error for a 1-based line number
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse { line, message: msg.into() }
    }

    /// Create a generic error from any displayable type
    pub fn generic(msg: impl std::fmt::Display) -> Self {
        Self::Generic(msg.to_string())
    }
}
