//! Prometheus metrics for the rtg quoter.
//!
//! Covers:
//! - Inbound events by kind
//! - Outbound commands by kind (inserts, cancels, hedges)
//! - Hedged volume by side
//! - Throttle pauses and exchange errors
//! - Current position and fair value
//!
//! # Panics
//!
//! First access to a metric panics if its name is already registered in the
//! default registry.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

use crate::error::TelemetryResult;

/// Inbound exchange events.
/// Labels: kind (order_book/trade_ticks/order_filled/order_status/error)
pub static EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("rtg_events_total", "Inbound exchange events", &["kind"]).unwrap()
});

/// Outbound exchange commands.
/// Labels: kind (insert/cancel/hedge)
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "rtg_commands_total",
        "Outbound exchange commands",
        &["kind"]
    )
    .unwrap()
});

/// Hedged lots by hedge side.
pub static HEDGE_VOLUME_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "rtg_hedge_volume_total",
        "Lots sent in hedge orders",
        &["side"]
    )
    .unwrap()
});

/// Throttle pauses (action budget exhausted before the window elapsed).
pub static THROTTLE_PAUSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rtg_throttle_pauses_total",
        "Times quoting paused for the action window"
    )
    .unwrap()
});

/// Exchange-reported order errors.
pub static EXCHANGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("rtg_exchange_errors_total", "Exchange order errors").unwrap()
});

/// Undecodable feed records.
pub static FEED_DECODE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rtg_feed_decode_errors_total",
        "Feed records that failed to decode"
    )
    .unwrap()
});

/// Signed position in lots.
pub static POSITION_LOTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("rtg_position_lots", "Current signed position in lots").unwrap()
});

/// Latest fair value in minor currency units (0 before the first estimate).
pub static FAIR_VALUE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("rtg_fair_value", "Latest fair value estimate").unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record an inbound event.
    pub fn event_received(kind: &str) {
        EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record an outbound command.
    pub fn command_sent(kind: &str) {
        COMMANDS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record hedged volume.
    pub fn hedge_volume(side: &str, volume: u64) {
        HEDGE_VOLUME_TOTAL.with_label_values(&[side]).inc_by(volume);
    }

    /// Record a throttle pause.
    pub fn throttle_paused() {
        THROTTLE_PAUSES_TOTAL.inc();
    }

    /// Record an exchange order error.
    pub fn exchange_error() {
        EXCHANGE_ERRORS_TOTAL.inc();
    }

    /// Record an undecodable feed record.
    pub fn feed_decode_error() {
        FEED_DECODE_ERRORS_TOTAL.inc();
    }

    /// Update position.
    pub fn position_set(lots: i64) {
        POSITION_LOTS.set(lots);
    }

    /// Update fair value.
    pub fn fair_value_set(value: i64) {
        FAIR_VALUE.set(value);
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        Metrics::command_sent("insert");
        Metrics::hedge_volume("sell", 10);
        Metrics::position_set(10);
        let text = Metrics::render().unwrap();
        assert!(text.contains("rtg_commands_total"));
        assert!(text.contains("rtg_hedge_volume_total"));
        assert!(text.contains("rtg_position_lots 10"));
    }
}
