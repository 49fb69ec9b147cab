//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quoter configuration error: {0}")]
    Quoter(#[from] rtg_mm::ConfigError),

    #[error("Core error: {0}")]
    Core(#[from] rtg_core::CoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] rtg_telemetry::TelemetryError),

    #[error("Command encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed task failed: {0}")]
    FeedTask(String),
}

pub type AppResult<T> = Result<T, AppError>;
