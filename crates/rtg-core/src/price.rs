//! Integer price and volume types.
//!
//! Exchange prices are whole numbers of the minor currency unit (cents) and
//! must be a multiple of the instrument's tick size. Volumes are whole lots
//! and can never be negative.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Traded volume in lots.
pub type Volume = u32;

/// Price in minor currency units.
///
/// Zero is used by the exchange feed to denote an empty book level, and by
/// the engine to mean "do not quote this side".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub u32);

impl Price {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Largest multiple of `tick` not above this price.
    #[inline]
    pub fn floor_to_tick(&self, tick: TickSize) -> Self {
        Self(self.0 / tick.0 * tick.0)
    }

    /// Smallest multiple of `tick` not below this price, saturating at the
    /// largest representable multiple.
    #[inline]
    pub fn ceil_to_tick(&self, tick: TickSize) -> Self {
        match self.0.checked_add(tick.0 - 1) {
            Some(v) => Self(v / tick.0 * tick.0),
            None => Self(u32::MAX / tick.0 * tick.0),
        }
    }

    /// One tick lower, floored at zero.
    #[inline]
    pub fn tick_down(&self, tick: TickSize) -> Self {
        Self(self.0.saturating_sub(tick.0))
    }

    /// One tick higher, saturating at `u32::MAX`.
    #[inline]
    pub fn tick_up(&self, tick: TickSize) -> Self {
        Self(self.0.saturating_add(tick.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Minimal price increment accepted by the exchange. Always nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TickSize(u32);

impl TickSize {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(CoreError::InvalidTickSize(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn inner(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TickSize {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TickSize> for u32 {
    fn from(tick: TickSize) -> Self {
        tick.0
    }
}

impl Default for TickSize {
    fn default() -> Self {
        Self(100)
    }
}
