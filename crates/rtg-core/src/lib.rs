//! Core domain types for the rtg quoting engine.
//!
//! This crate provides the vocabulary shared by the engine and its host:
//! - `Price`: integer price in minor currency units
//! - `Side`, `Lifespan`, `OrderId`: order identity and direction
//! - `ExchangeEvent`: inbound notifications from the exchange session
//! - `ExchangeCommand`: outbound insert/cancel/hedge instructions

pub mod command;
pub mod error;
pub mod event;
pub mod order;
pub mod price;

pub use command::ExchangeCommand;
pub use error::{CoreError, Result};
pub use event::{ExchangeEvent, InstrumentId, OrderBookSnapshot, TOP_LEVEL_COUNT};
pub use order::{Lifespan, OrderId, OrderIdSequence, Side};
pub use price::{Price, TickSize, Volume};
