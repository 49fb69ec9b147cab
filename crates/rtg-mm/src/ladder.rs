//! Inventory-aware quote sizing.
//!
//! The position selects a bucket among ordered breakpoints; the bucket's rung
//! gives base (bid, ask) volumes. The side that would grow existing exposure
//! is then shrunk by the position itself, so quoting is self-limiting.

use rtg_core::Volume;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Base volumes for one inventory bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderRung {
    pub bid: Volume,
    pub ask: Volume,
}

impl LadderRung {
    pub const fn new(bid: Volume, ask: Volume) -> Self {
        Self { bid, ask }
    }

    /// Combined volume of both sides.
    pub fn total(&self) -> u64 {
        u64::from(self.bid) + u64::from(self.ask)
    }
}

/// Quote volumes after the inventory adjustment. Zero means "do not quote".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteSizes {
    pub bid: Volume,
    pub ask: Volume,
}

/// Breakpoints plus the rungs they select.
#[derive(Debug, Clone)]
pub struct QuoteLadder {
    breakpoints: Vec<i64>,
    rungs: Vec<LadderRung>,
}

impl QuoteLadder {
    /// Build a ladder. Breakpoints must be strictly increasing and there
    /// must be exactly one more rung than breakpoints.
    pub fn new(breakpoints: Vec<i64>, rungs: Vec<LadderRung>) -> Result<Self, ConfigError> {
        if let Some(index) = breakpoints.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ConfigError::UnsortedBreakpoints { index: index + 1 });
        }
        if rungs.len() != breakpoints.len() + 1 {
            return Err(ConfigError::LadderLength {
                expected: breakpoints.len() + 1,
                actual: rungs.len(),
            });
        }
        Ok(Self { breakpoints, rungs })
    }

    /// Bucket index for a position: the number of breakpoints strictly below it.
    pub fn bucket(&self, position: i64) -> usize {
        self.breakpoints.partition_point(|&b| b < position)
    }

    /// Rung selected for a position.
    pub fn rung(&self, position: i64) -> LadderRung {
        self.rungs[self.bucket(position)]
    }

    /// Quote volumes for a position.
    ///
    /// Long inventory shrinks the bid, short inventory shrinks the ask.
    /// Results are clamped at zero.
    pub fn size(&self, position: i64) -> QuoteSizes {
        let rung = self.rung(position);
        let exposure = position.unsigned_abs();
        if position >= 0 {
            QuoteSizes {
                bid: shrink(rung.bid, exposure),
                ask: rung.ask,
            }
        } else {
            QuoteSizes {
                bid: rung.bid,
                ask: shrink(rung.ask, exposure),
            }
        }
    }
}

fn shrink(volume: Volume, by: u64) -> Volume {
    // by > u32::MAX implies the result clamps to zero anyway
    u64::from(volume).saturating_sub(by) as Volume
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoterConfig;

    fn ladder() -> QuoteLadder {
        let config = QuoterConfig::default();
        QuoteLadder::new(config.breakpoints, config.ladder).unwrap()
    }

    #[test]
    fn test_flat_position_uses_risk_adjusted_rung() {
        let sizes = ladder().size(0);
        assert_eq!(sizes, QuoteSizes { bid: 45, ask: 45 });
    }

    #[test]
    fn test_long_beyond_top_breakpoint_clamps_bid() {
        let ladder = ladder();
        assert_eq!(ladder.bucket(120), 12);
        let sizes = ladder.size(120);
        assert_eq!(sizes.bid, 0);
        assert_eq!(sizes.ask, 95);
    }

    #[test]
    fn test_short_position_shrinks_ask() {
        let ladder = ladder();
        // -50 sits in (-64, -44]
        assert_eq!(ladder.bucket(-50), 4);
        let sizes = ladder.size(-50);
        assert_eq!(sizes.bid, 45);
        assert_eq!(sizes.ask, 20);
    }

    #[test]
    fn test_short_beyond_bottom_breakpoint() {
        let ladder = ladder();
        assert_eq!(ladder.bucket(-200), 0);
        assert_eq!(ladder.size(-200), QuoteSizes { bid: 95, ask: 0 });
    }

    #[test]
    fn test_breakpoint_is_upper_edge_of_its_bucket() {
        let ladder = ladder();
        assert_eq!(ladder.bucket(1), 6);
        assert_eq!(ladder.bucket(2), 7);
        assert_eq!(ladder.size(1), QuoteSizes { bid: 29, ask: 30 });
    }

    #[test]
    fn test_rejects_unsorted_breakpoints() {
        let err = QuoteLadder::new(vec![0, 5, 5], vec![LadderRung::new(1, 1); 4]).unwrap_err();
        assert_eq!(err, ConfigError::UnsortedBreakpoints { index: 2 });
    }

    #[test]
    fn test_rejects_wrong_rung_count() {
        let err = QuoteLadder::new(vec![0], vec![LadderRung::new(1, 1)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::LadderLength {
                expected: 2,
                actual: 1
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_sizes_never_exceed_rung(position in -1_000i64..1_000) {
            let ladder = ladder();
            let rung = ladder.rung(position);
            let sizes = ladder.size(position);
            proptest::prop_assert!(sizes.bid <= rung.bid);
            proptest::prop_assert!(sizes.ask <= rung.ask);
            proptest::prop_assert!(u64::from(sizes.bid) + u64::from(sizes.ask) <= rung.total());
        }
    }
}
