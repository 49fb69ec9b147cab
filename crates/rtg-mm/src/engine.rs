//! Quote lifecycle management.
//!
//! Manages the full decision loop for one instrument:
//! - Refresh fair value and quote targets on each book update
//! - Cancel a working quote whose target moved
//! - Place a new quote on each idle side, sized by position
//! - Hedge every fill with an aggressive opposite order
//!
//! At most one bid and one ask are working at any time. A side's quote id
//! is nonzero iff an order is resting for that side.

use std::collections::HashSet;

use rtg_core::{
    ExchangeCommand, ExchangeEvent, Lifespan, OrderBookSnapshot, OrderId, OrderIdSequence, Price,
    Side, Volume,
};
use tracing::{debug, info, warn};

use crate::config::QuoterConfig;
use crate::error::ConfigError;
use crate::fair_value::{compute_fair_value, QuoteTargets};
use crate::ladder::QuoteLadder;
use crate::throttle::{ActionThrottle, ThrottleDecision};

/// Lifecycle status of a side's quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStatus {
    /// Nothing resting (never quoted, cancelled, or rejected).
    #[default]
    Idle,
    /// Resting at the exchange.
    Working,
    /// Fully traded.
    Filled,
}

/// The engine's quote on one side of the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Order id; `OrderId::NONE` when nothing is resting.
    pub id: OrderId,
    pub side: Side,
    /// Resting price, or the last price quoted on this side.
    pub price: Price,
    /// Unfilled volume.
    pub volume: Volume,
    pub status: QuoteStatus,
}

impl Quote {
    fn idle(side: Side) -> Self {
        Self {
            id: OrderId::NONE,
            side,
            price: Price::ZERO,
            volume: 0,
            status: QuoteStatus::Idle,
        }
    }

    pub fn is_working(&self) -> bool {
        !self.id.is_none()
    }

    fn close(&mut self, status: QuoteStatus) {
        self.id = OrderId::NONE;
        self.volume = 0;
        self.status = status;
    }
}

/// Point-in-time view of the engine for logging.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub position: i64,
    pub fair_value: Option<Price>,
    pub targets: QuoteTargets,
    pub bid: Quote,
    pub ask: Quote,
    pub action_count: u32,
    pub resume_at_ms: Option<u64>,
    pub next_order_id: OrderId,
}

/// Single-instrument quoting engine.
///
/// Purely reactive: every handler takes the event plus the current time and
/// returns the commands to send. Time never advances on its own; a throttle
/// pause is left through `on_resume`.
#[derive(Debug)]
pub struct QuotingEngine {
    config: QuoterConfig,
    ladder: QuoteLadder,
    throttle: ActionThrottle,
    order_ids: OrderIdSequence,
    bid: Quote,
    ask: Quote,
    /// Every bid id not yet reported done, including ones cancelled locally.
    live_bids: HashSet<OrderId>,
    /// Every ask id not yet reported done, including ones cancelled locally.
    live_asks: HashSet<OrderId>,
    position: i64,
    fair_value: Option<Price>,
    targets: QuoteTargets,
    last_sequence: Option<u64>,
    /// Latest book received during a throttle pause.
    deferred_book: Option<OrderBookSnapshot>,
}

impl QuotingEngine {
    /// Create an engine at session start: flat, no quotes, fresh id sequence.
    pub fn new(config: QuoterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ladder = QuoteLadder::new(config.breakpoints.clone(), config.ladder.clone())?;
        let throttle = ActionThrottle::from_config(&config);
        Ok(Self {
            config,
            ladder,
            throttle,
            order_ids: OrderIdSequence::new(),
            bid: Quote::idle(Side::Buy),
            ask: Quote::idle(Side::Sell),
            live_bids: HashSet::new(),
            live_asks: HashSet::new(),
            position: 0,
            fair_value: None,
            targets: QuoteTargets::default(),
            last_sequence: None,
            deferred_book: None,
        })
    }

    /// Dispatch any inbound event.
    pub fn on_event(&mut self, event: &ExchangeEvent, now_ms: u64) -> Vec<ExchangeCommand> {
        match event {
            ExchangeEvent::OrderBook(book) => self.on_order_book_update(book, now_ms),
            ExchangeEvent::TradeTicks(ticks) => {
                self.on_trade_ticks(ticks);
                Vec::new()
            }
            ExchangeEvent::OrderFilled {
                order_id,
                price,
                volume,
            } => self
                .on_order_filled(*order_id, *price, *volume)
                .into_iter()
                .collect(),
            ExchangeEvent::OrderStatus {
                order_id,
                fill_volume,
                remaining_volume,
                fees,
            } => {
                self.on_order_status(*order_id, *fill_volume, *remaining_volume, *fees);
                Vec::new()
            }
            ExchangeEvent::Error { order_id, message } => {
                self.on_error(*order_id, message);
                Vec::new()
            }
        }
    }

    /// Process a book snapshot: reprice, cancel stale quotes, place new ones.
    pub fn on_order_book_update(
        &mut self,
        book: &OrderBookSnapshot,
        now_ms: u64,
    ) -> Vec<ExchangeCommand> {
        if book.instrument != self.config.instrument {
            return Vec::new();
        }

        if let Some(last) = self.last_sequence {
            if book.sequence <= last {
                debug!(
                    sequence = book.sequence,
                    last_sequence = last,
                    "Dropping stale book update"
                );
                return Vec::new();
            }
        }
        self.last_sequence = Some(book.sequence);

        if self.throttle.is_paused() {
            debug!(
                sequence = book.sequence,
                resume_at_ms = ?self.throttle.resume_at_ms(),
                "Throttle paused, deferring book update"
            );
            self.deferred_book = Some(book.clone());
            return Vec::new();
        }

        self.run_cycle(book, now_ms)
    }

    /// Leave a throttle pause once its time has come, replaying the latest
    /// book received while paused.
    pub fn on_resume(&mut self, now_ms: u64) -> Vec<ExchangeCommand> {
        if !self.throttle.resume(now_ms) {
            return Vec::new();
        }
        debug!(now_ms = now_ms, "Throttle window reset, resuming quoting");
        match self.deferred_book.take() {
            Some(book) => self.run_cycle(&book, now_ms),
            None => Vec::new(),
        }
    }

    /// Trade ticks carry no decision input; they are only logged.
    pub fn on_trade_ticks(&self, ticks: &OrderBookSnapshot) {
        debug!(
            instrument = ticks.instrument,
            sequence = ticks.sequence,
            "Trade ticks received"
        );
    }

    /// Record a (partial) fill and return the offsetting hedge.
    pub fn on_order_filled(
        &mut self,
        order_id: OrderId,
        price: Price,
        volume: Volume,
    ) -> Option<ExchangeCommand> {
        info!(
            order_id = %order_id,
            price = %price,
            volume = volume,
            "Order filled"
        );

        let filled_side = if self.live_bids.contains(&order_id) {
            Side::Buy
        } else if self.live_asks.contains(&order_id) {
            Side::Sell
        } else {
            debug!(order_id = %order_id, "Fill for unknown order ignored");
            return None;
        };

        if volume == 0 {
            return None;
        }

        let quote = self.quote_mut(filled_side);
        if quote.id == order_id {
            quote.volume = quote.volume.saturating_sub(volume);
        }

        self.position += filled_side.sign() * i64::from(volume);
        if self.position.abs() > self.config.position_limit {
            warn!(
                position = self.position,
                limit = self.config.position_limit,
                "Position beyond configured limit"
            );
        }

        let hedge_side = filled_side.opposite();
        let hedge_price = match hedge_side {
            Side::Sell => self.config.min_bid_tick(),
            Side::Buy => self.config.max_ask_tick(),
        };
        let hedge_id = self.order_ids.next_id();
        info!(
            order_id = %hedge_id,
            side = %hedge_side,
            price = %hedge_price,
            volume = volume,
            position = self.position,
            "Hedging fill"
        );
        Some(ExchangeCommand::Hedge {
            order_id: hedge_id,
            side: hedge_side,
            price: hedge_price,
            volume,
        })
    }

    /// Track order status; zero remaining volume closes the order whatever
    /// the cause.
    pub fn on_order_status(
        &mut self,
        order_id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    ) {
        debug!(
            order_id = %order_id,
            fill_volume = fill_volume,
            remaining_volume = remaining_volume,
            fees = fees,
            "Order status"
        );

        if remaining_volume != 0 {
            for quote in [&mut self.bid, &mut self.ask] {
                if quote.id == order_id {
                    quote.volume = remaining_volume;
                }
            }
            return;
        }

        let status = if fill_volume > 0 {
            QuoteStatus::Filled
        } else {
            QuoteStatus::Idle
        };
        if self.bid.id == order_id {
            self.bid.close(status);
        } else if self.ask.id == order_id {
            self.ask.close(status);
        }

        self.live_bids.remove(&order_id);
        self.live_asks.remove(&order_id);
    }

    /// An exchange error closes the referenced order, whatever the cause.
    pub fn on_error(&mut self, order_id: OrderId, message: &str) {
        warn!(
            order_id = %order_id,
            message = message,
            position = self.position,
            bid_volume = self.bid.volume,
            ask_volume = self.ask.volume,
            "Exchange reported order error"
        );
        self.on_order_status(order_id, 0, 0, 0);
    }

    /// Next time `on_resume` should be called, if paused.
    pub fn resume_at_ms(&self) -> Option<u64> {
        self.throttle.resume_at_ms()
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn fair_value(&self) -> Option<Price> {
        self.fair_value
    }

    pub fn bid(&self) -> &Quote {
        &self.bid
    }

    pub fn ask(&self) -> &Quote {
        &self.ask
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            position: self.position,
            fair_value: self.fair_value,
            targets: self.targets,
            bid: self.bid.clone(),
            ask: self.ask.clone(),
            action_count: self.throttle.count(),
            resume_at_ms: self.throttle.resume_at_ms(),
            next_order_id: self.order_ids.peek(),
        }
    }

    // === Private helpers ===

    fn run_cycle(&mut self, book: &OrderBookSnapshot, now_ms: u64) -> Vec<ExchangeCommand> {
        let mut commands = Vec::new();
        self.throttle.begin_cycle(now_ms);

        if self.throttle.can_reprice() {
            self.update_targets(book);
            for side in [Side::Buy, Side::Sell] {
                commands.extend(self.cancel_if_stale(side));
            }
        }

        if self.throttle.can_quote() {
            let sizes = self.ladder.size(self.position);
            debug!(
                position = self.position,
                bucket = self.ladder.bucket(self.position),
                bid_volume = sizes.bid,
                ask_volume = sizes.ask,
                "Quote sizes"
            );
            commands.extend(self.place_if_idle(Side::Buy, sizes.bid));
            commands.extend(self.place_if_idle(Side::Sell, sizes.ask));
        } else if let ThrottleDecision::Reset = self.throttle.check_window(now_ms) {
            debug!("Action window elapsed, counter reset");
        }

        commands
    }

    fn update_targets(&mut self, book: &OrderBookSnapshot) {
        match compute_fair_value(book, &self.config.level_weights, self.config.tick_size) {
            Ok(fair_value) => {
                self.fair_value = Some(fair_value);
                self.targets = QuoteTargets::around(fair_value, book, self.config.tick_size);
                debug!(
                    sequence = book.sequence,
                    fair_value = %fair_value,
                    bid_target = %self.targets.bid,
                    ask_target = %self.targets.ask,
                    "Fair value updated"
                );
            }
            Err(reason) => {
                debug!(
                    sequence = book.sequence,
                    reason = %reason,
                    "No fair value this cycle"
                );
            }
        }
    }

    fn cancel_if_stale(&mut self, side: Side) -> Option<ExchangeCommand> {
        let target = self.targets.for_side(side);
        let quote = self.quote_mut(side);
        if !quote.is_working() || target.is_zero() || target == quote.price {
            return None;
        }

        let order_id = quote.id;
        debug!(
            order_id = %order_id,
            side = %side,
            resting_price = %quote.price,
            target = %target,
            "Cancelling stale quote"
        );
        quote.close(QuoteStatus::Idle);
        self.throttle.record_action();
        Some(ExchangeCommand::Cancel { order_id })
    }

    fn place_if_idle(&mut self, side: Side, volume: Volume) -> Option<ExchangeCommand> {
        let target = self.targets.for_side(side);
        if self.quote_mut(side).is_working() || target.is_zero() || volume == 0 {
            return None;
        }

        let order_id = self.order_ids.next_id();
        *self.quote_mut(side) = Quote {
            id: order_id,
            side,
            price: target,
            volume,
            status: QuoteStatus::Working,
        };
        match side {
            Side::Buy => self.live_bids.insert(order_id),
            Side::Sell => self.live_asks.insert(order_id),
        };
        self.throttle.record_action();

        info!(
            order_id = %order_id,
            side = %side,
            price = %target,
            volume = volume,
            "Placing quote"
        );
        Some(ExchangeCommand::Insert {
            order_id,
            side,
            price: target,
            volume,
            lifespan: Lifespan::GoodForDay,
        })
    }

    fn quote_mut(&mut self, side: Side) -> &mut Quote {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }
}
