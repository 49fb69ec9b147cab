//! Outbound exchange commands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::order::{Lifespan, OrderId, Side};
use crate::price::{Price, Volume};

/// Instruction for the exchange session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeCommand {
    /// Rest a new limit order.
    Insert {
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    },
    /// Pull a resting order.
    Cancel { order_id: OrderId },
    /// Aggressive offsetting order on the hedge instrument.
    Hedge {
        order_id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
}

impl ExchangeCommand {
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Insert { order_id, .. }
            | Self::Cancel { order_id }
            | Self::Hedge { order_id, .. } => *order_id,
        }
    }

    /// Short command kind label for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Cancel { .. } => "cancel",
            Self::Hedge { .. } => "hedge",
        }
    }
}

impl fmt::Display for ExchangeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert {
                order_id,
                side,
                price,
                volume,
                lifespan,
            } => write!(f, "insert #{order_id} {side} {volume}@{price} {lifespan}"),
            Self::Cancel { order_id } => write!(f, "cancel #{order_id}"),
            Self::Hedge {
                order_id,
                side,
                price,
                volume,
            } => write!(f, "hedge #{order_id} {side} {volume}@{price}"),
        }
    }
}
