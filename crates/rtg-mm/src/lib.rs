//! Market making engine for a single instrument.
//!
//! Provides the full quoting decision loop:
//! - Fair value from the two best levels of each book side
//! - Quote sizing from an inventory ladder
//! - Quote lifecycle management (one working bid, one working ask)
//! - Per-second action throttling
//! - Hedging on fills
//!
//! # Architecture
//!
//! ```text
//! Book update → QuotingEngine.on_order_book_update()
//!                ├─ fair_value: compute bid/ask targets
//!                ├─ ActionThrottle: may we act this window?
//!                ├─ QuoteLadder: size by position
//!                └─ ExchangeCommand: cancel/insert
//! Fill        → QuotingEngine.on_order_filled() → ExchangeCommand::Hedge
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod fair_value;
pub mod ladder;
pub mod throttle;

pub use config::{LevelWeights, QuoterConfig};
pub use engine::{EngineSnapshot, Quote, QuoteStatus, QuotingEngine};
pub use error::{ConfigError, FairValueError};
pub use fair_value::{compute_fair_value, QuoteTargets};
pub use ladder::{LadderRung, QuoteLadder, QuoteSizes};
pub use throttle::{ActionThrottle, ThrottleDecision};
