//! Order-related types and identifiers.
//!
//! Provides order side, lifespan, and the client order id sequence shared by
//! quotes and hedges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// How long a resting order stays on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifespan {
    /// Rests until filled, cancelled, or the session ends.
    #[default]
    GoodForDay,
}

impl fmt::Display for Lifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoodForDay => write!(f, "GFD"),
        }
    }
}

/// Client order id.
///
/// Zero is reserved to mean "no order"; issued ids start at 1.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic order id source.
///
/// One sequence is shared by bids, asks and hedges so ids are unique per
/// session and strictly increasing in issuance order.
#[derive(Debug)]
pub struct OrderIdSequence {
    next: u64,
}

impl OrderIdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> OrderId {
        let id = OrderId(self.next);
        self.next += 1;
        id
    }

    /// Id that the next call to `next_id` will return.
    pub fn peek(&self) -> OrderId {
        OrderId(self.next)
    }
}

impl Default for OrderIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::Buy.sign(), 1);
        assert_eq!(Side::Sell.sign(), -1);
    }

    #[test]
    fn test_sequence_starts_at_one() {
        let mut seq = OrderIdSequence::new();
        assert_eq!(seq.peek(), OrderId::new(1));
        let first = seq.next_id();
        assert_eq!(first, OrderId::new(1));
        assert!(!first.is_none());
        assert_eq!(seq.next_id(), OrderId::new(2));
    }

    #[test]
    fn test_order_id_none() {
        assert!(OrderId::NONE.is_none());
        assert!(OrderId::default().is_none());
    }

    #[test]
    fn test_lifespan_default_is_good_for_day() {
        assert_eq!(Lifespan::default(), Lifespan::GoodForDay);
        assert_eq!(Lifespan::GoodForDay.to_string(), "GFD");
    }
}
