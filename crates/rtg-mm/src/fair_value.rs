//! Fair-value estimation and quote targets.
//!
//! Fair value is the volume-weighted mean of the two best bid and two best
//! ask prices, each volume scaled by its level weight, truncated to a tick.

use rtg_core::{OrderBookSnapshot, Price, Side, TickSize};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::LevelWeights;
use crate::error::FairValueError;

/// Compute the fair value of a book snapshot.
///
/// Returns an error instead of a price when the book has no bid or when all
/// weighted volumes are zero; callers treat both as "no update this cycle".
pub fn compute_fair_value(
    book: &OrderBookSnapshot,
    weights: &LevelWeights,
    tick: TickSize,
) -> Result<Price, FairValueError> {
    if book.best_bid().is_zero() {
        return Err(FairValueError::NoBid);
    }

    let levels = [
        (book.bid_prices[0], book.bid_volumes[0], weights.l1),
        (book.bid_prices[1], book.bid_volumes[1], weights.l2),
        (book.ask_prices[0], book.ask_volumes[0], weights.l1),
        (book.ask_prices[1], book.ask_volumes[1], weights.l2),
    ];

    let mut numerator = Decimal::ZERO;
    let mut denominator = Decimal::ZERO;
    for (price, volume, weight) in levels {
        let w = Decimal::from(volume) * weight;
        numerator += Decimal::from(price.inner()) * w;
        denominator += w;
    }

    if denominator.is_zero() {
        return Err(FairValueError::ZeroWeight);
    }

    // A weighted mean of u32 prices lies between them, so it fits in u32.
    let tick = Decimal::from(tick.inner());
    let fair = (numerator / denominator / tick).trunc() * tick;
    Ok(Price::new(fair.to_u32().unwrap_or(u32::MAX)))
}

/// Prices the engine wants to quote. Zero means "do not quote this side".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteTargets {
    pub bid: Price,
    pub ask: Price,
}

impl QuoteTargets {
    /// One tick either side of fair value, dropping any side the book has
    /// no liquidity on.
    pub fn around(fair_value: Price, book: &OrderBookSnapshot, tick: TickSize) -> Self {
        let bid = if book.best_bid().is_zero() {
            Price::ZERO
        } else {
            fair_value.tick_down(tick)
        };
        let ask = if book.best_ask().is_zero() {
            Price::ZERO
        } else {
            fair_value.tick_up(tick)
        };
        Self { bid, ask }
    }

    pub fn for_side(&self, side: Side) -> Price {
        match side {
            Side::Buy => self.bid,
            Side::Sell => self.ask,
        }
    }
}
