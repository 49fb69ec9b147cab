//! Host application for the rtg quoting engine.
//!
//! Wires the engine to the outside world:
//! - Newline-delimited JSON event feed (file or stdin)
//! - Command sink (JSON lines on stdout by default)
//! - Throttle resumption timer
//! - Metrics updates per event

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod sink;

pub use app::Application;
pub use config::{AppConfig, LoadedConfig};
pub use error::{AppError, AppResult};
pub use sink::{CommandSink, JsonLinesSink};
