//! Error types for Lanescroll
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Lanescroll
#[derive(Debug, Error)]
pub enum LanescrollError {
    /// Renderer refused to create, move or remove a visual
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Source pattern could not be expanded
    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for Lanescroll operations
pub type Result<T> = std::result::Result<T, LanescrollError>;
