//! Inbound exchange events.
//!
//! The exchange session delivers order-book snapshots, trade ticks and
//! order notifications. On the wire (and in replay files) each event is one
//! JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::order::OrderId;
use crate::price::{Price, Volume};

/// Number of price levels reported per side.
pub const TOP_LEVEL_COUNT: usize = 5;

/// Exchange instrument identifier.
pub type InstrumentId = u32;

/// Top-of-book snapshot, best level first.
///
/// A price of zero denotes an empty level. Trade-tick updates use the same
/// shape with the traded prices and aggregated volumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub instrument: InstrumentId,
    pub sequence: u64,
    pub ask_prices: [Price; TOP_LEVEL_COUNT],
    pub ask_volumes: [Volume; TOP_LEVEL_COUNT],
    pub bid_prices: [Price; TOP_LEVEL_COUNT],
    pub bid_volumes: [Volume; TOP_LEVEL_COUNT],
}

impl OrderBookSnapshot {
    /// Best bid price (zero when the bid side is empty).
    pub fn best_bid(&self) -> Price {
        self.bid_prices[0]
    }

    /// Best ask price (zero when the ask side is empty).
    pub fn best_ask(&self) -> Price {
        self.ask_prices[0]
    }
}

/// Notification from the exchange session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// Periodic order-book snapshot.
    OrderBook(OrderBookSnapshot),
    /// Recent trading activity. Informational only.
    TradeTicks(OrderBookSnapshot),
    /// One of our orders traded (possibly partially, possibly repeatedly).
    OrderFilled {
        order_id: OrderId,
        price: Price,
        volume: Volume,
    },
    /// Status change of one of our orders. Zero remaining means done.
    OrderStatus {
        order_id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    },
    /// The exchange rejected or failed an order.
    Error { order_id: OrderId, message: String },
}

impl ExchangeEvent {
    /// Decode one newline-delimited JSON record.
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Short event kind label for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderBook(_) => "order_book",
            Self::TradeTicks(_) => "trade_ticks",
            Self::OrderFilled { .. } => "order_filled",
            Self::OrderStatus { .. } => "order_status",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_order_book_line() {
        let line = r#"{"type":"order_book","instrument":0,"sequence":7,
            "ask_prices":[10100,10200,0,0,0],"ask_volumes":[5,6,0,0,0],
            "bid_prices":[9900,9800,0,0,0],"bid_volumes":[4,3,0,0,0]}"#
            .replace('\n', "");
        let event = ExchangeEvent::from_json_line(&line).unwrap();
        match event {
            ExchangeEvent::OrderBook(book) => {
                assert_eq!(book.sequence, 7);
                assert_eq!(book.best_bid(), Price::new(9_900));
                assert_eq!(book.best_ask(), Price::new(10_100));
            }
            other => panic!("Expected OrderBook, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_event() {
        let event =
            ExchangeEvent::from_json_line(r#"{"type":"error","order_id":3,"message":"bad"}"#)
                .unwrap();
        assert_eq!(event.kind(), "error");
        assert_eq!(
            event,
            ExchangeEvent::Error {
                order_id: OrderId::new(3),
                message: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(ExchangeEvent::from_json_line(r#"{"type":"heartbeat"}"#).is_err());
    }
}
