//! Error types for rtg-mm.

use thiserror::Error;

/// Invalid quoter configuration. Raised at engine construction only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Breakpoints must be strictly increasing (index {index})")]
    UnsortedBreakpoints { index: usize },

    #[error("Ladder needs {expected} rungs for the configured breakpoints, got {actual}")]
    LadderLength { expected: usize, actual: usize },

    #[error("Level weights must be non-negative and not both zero")]
    InvalidWeights,

    #[error("Quote ceiling {quote} exceeds reprice ceiling {reprice}")]
    CeilingOrder { quote: u32, reprice: u32 },

    #[error("Throttle window must be positive")]
    EmptyWindow,

    #[error("Minimum bid {min_bid} above maximum ask {max_ask}")]
    PriceBounds { min_bid: u32, max_ask: u32 },
}

/// Why a book snapshot yielded no fair value this cycle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FairValueError {
    #[error("No bid on the book")]
    NoBid,

    #[error("Weighted volume is zero")]
    ZeroWeight,
}
