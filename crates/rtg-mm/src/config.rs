//! Quoting engine configuration.

use rtg_core::{InstrumentId, Price, TickSize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ladder::{LadderRung, QuoteLadder};

/// Volume reduction applied to the default ladder rungs that add exposure.
pub const DEFAULT_RISK_FACTOR: u32 = 4;

/// Per-level weights of the fair-value estimator.
///
/// Both the numerator and the denominator of the weighted mean use the same
/// weights, so they need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelWeights {
    /// Weight of the best level on each side.
    pub l1: Decimal,
    /// Weight of the second level on each side.
    pub l2: Decimal,
}

impl Default for LevelWeights {
    fn default() -> Self {
        Self {
            l1: Decimal::new(35, 2), // 0.35
            l2: Decimal::new(65, 2), // 0.65
        }
    }
}

/// Quoting engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoterConfig {
    /// Instrument whose book drives quoting. Other books are ignored.
    #[serde(default)]
    pub instrument: InstrumentId,

    /// Exchange tick size in minor currency units.
    #[serde(default)]
    pub tick_size: TickSize,

    /// Fair-value level weights.
    #[serde(default)]
    pub level_weights: LevelWeights,

    /// Fair value is refreshed and stale quotes cancelled only while the
    /// window's action count is at or below this ceiling.
    #[serde(default = "default_reprice_action_ceiling")]
    pub reprice_action_ceiling: u32,

    /// New quotes are placed only while the window's action count is below
    /// this ceiling. Reaching it triggers the wait-and-reset.
    #[serde(default = "default_quote_action_ceiling")]
    pub quote_action_ceiling: u32,

    /// Throttle window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Extra delay added to a throttle pause so the exchange's own window has
    /// rolled over by the time we resume.
    #[serde(default = "default_window_slack_ms")]
    pub window_slack_ms: u64,

    /// Nominal position limit in lots. Breaches are logged, sizing keeps the
    /// position inside it in normal operation.
    #[serde(default = "default_position_limit")]
    pub position_limit: i64,

    /// Ordered inventory thresholds selecting the ladder bucket.
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<i64>,

    /// Base (bid, ask) volumes per bucket; one more rung than breakpoints.
    #[serde(default = "default_ladder")]
    pub ladder: Vec<LadderRung>,

    /// Lowest price the exchange accepts.
    #[serde(default = "default_min_bid")]
    pub min_bid: Price,

    /// Highest price the exchange accepts.
    #[serde(default = "default_max_ask")]
    pub max_ask: Price,
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            instrument: 0,
            tick_size: TickSize::default(),
            level_weights: LevelWeights::default(),
            reprice_action_ceiling: default_reprice_action_ceiling(),
            quote_action_ceiling: default_quote_action_ceiling(),
            window_ms: default_window_ms(),
            window_slack_ms: default_window_slack_ms(),
            position_limit: default_position_limit(),
            breakpoints: default_breakpoints(),
            ladder: default_ladder(),
            min_bid: default_min_bid(),
            max_ask: default_max_ask(),
        }
    }
}

impl QuoterConfig {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = &self.level_weights;
        if weights.l1.is_sign_negative()
            || weights.l2.is_sign_negative()
            || (weights.l1.is_zero() && weights.l2.is_zero())
        {
            return Err(ConfigError::InvalidWeights);
        }
        if self.quote_action_ceiling > self.reprice_action_ceiling {
            return Err(ConfigError::CeilingOrder {
                quote: self.quote_action_ceiling,
                reprice: self.reprice_action_ceiling,
            });
        }
        if self.window_ms == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.min_bid > self.max_ask {
            return Err(ConfigError::PriceBounds {
                min_bid: self.min_bid.inner(),
                max_ask: self.max_ask.inner(),
            });
        }
        QuoteLadder::new(self.breakpoints.clone(), self.ladder.clone())?;
        Ok(())
    }

    /// Aggressive sell price for hedges: the minimum bid, rounded up to a tick.
    pub fn min_bid_tick(&self) -> Price {
        self.min_bid.ceil_to_tick(self.tick_size)
    }

    /// Aggressive buy price for hedges: the maximum ask, rounded down to a tick.
    pub fn max_ask_tick(&self) -> Price {
        self.max_ask.floor_to_tick(self.tick_size)
    }
}

fn default_reprice_action_ceiling() -> u32 {
    16
}
fn default_quote_action_ceiling() -> u32 {
    14
}
fn default_window_ms() -> u64 {
    1000
}
fn default_window_slack_ms() -> u64 {
    10
}
fn default_position_limit() -> i64 {
    100
}
fn default_breakpoints() -> Vec<i64> {
    vec![-94, -90, -81, -64, -44, 0, 1, 45, 65, 82, 91, 95]
}
fn default_ladder() -> Vec<LadderRung> {
    let r = DEFAULT_RISK_FACTOR;
    vec![
        LadderRung::new(95, 97),
        LadderRung::new(95, 95),
        LadderRung::new(85, 90),
        LadderRung::new(65, 82),
        LadderRung::new(45, 70),
        LadderRung::new(49 - r, 49 - r),
        LadderRung::new(30, 30),
        LadderRung::new(49 - r, 49 - r),
        LadderRung::new(70 - r, 45 - r),
        LadderRung::new(81 - r, 65),
        LadderRung::new(90 - r, 85),
        LadderRung::new(95 - r, 95),
        LadderRung::new(97 - r, 95),
    ]
}
fn default_min_bid() -> Price {
    Price::new(1)
}
fn default_max_ask() -> Price {
    Price::new(i32::MAX as u32)
}
