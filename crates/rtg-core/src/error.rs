//! Error types for rtg-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid tick size: {0}")]
    InvalidTickSize(u32),

    #[error("Event decode error: {0}")]
    EventDecode(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
