//! Action-rate throttling.
//!
//! Counts inserts and cancels per window. Once the quoting ceiling is
//! reached, the window is closed: if it has already lasted a full window
//! length the counter resets at once, otherwise the engine pauses until the
//! window has elapsed. The pause is reported as a resumption time rather
//! than slept on, so the host keeps processing fills and errors meanwhile.

use tracing::{debug, info};

use crate::config::QuoterConfig;

/// Outcome of closing a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Still below the quoting ceiling.
    Proceed,
    /// The window had already elapsed; counter reset.
    Reset,
    /// Too many actions too fast; resume at this time.
    Pause { resume_at_ms: u64 },
}

/// Per-window action counter.
#[derive(Debug)]
pub struct ActionThrottle {
    /// Actions taken in the current window.
    count: u32,
    /// Start of the current window.
    window_start_ms: u64,
    /// Set while paused.
    resume_at_ms: Option<u64>,
    reprice_ceiling: u32,
    quote_ceiling: u32,
    window_ms: u64,
    slack_ms: u64,
}

impl ActionThrottle {
    pub fn new(reprice_ceiling: u32, quote_ceiling: u32, window_ms: u64, slack_ms: u64) -> Self {
        Self {
            count: 0,
            window_start_ms: 0,
            resume_at_ms: None,
            reprice_ceiling,
            quote_ceiling,
            window_ms,
            slack_ms,
        }
    }

    pub fn from_config(config: &QuoterConfig) -> Self {
        Self::new(
            config.reprice_action_ceiling,
            config.quote_action_ceiling,
            config.window_ms,
            config.window_slack_ms,
        )
    }

    /// Stamp the window start if this is the first cycle of a fresh window.
    pub fn begin_cycle(&mut self, now_ms: u64) {
        if self.count == 0 {
            self.window_start_ms = now_ms;
        }
    }

    /// Fair value may be refreshed and stale quotes cancelled.
    pub fn can_reprice(&self) -> bool {
        self.count <= self.reprice_ceiling
    }

    /// New quotes may be placed.
    pub fn can_quote(&self) -> bool {
        self.count < self.quote_ceiling
    }

    /// Record one insert or cancel.
    pub fn record_action(&mut self) {
        self.count += 1;
        if self.count == self.quote_ceiling {
            debug!(count = self.count, "Action ceiling reached for window");
        }
    }

    /// Close the window once the quoting ceiling is reached.
    pub fn check_window(&mut self, now_ms: u64) -> ThrottleDecision {
        if self.can_quote() {
            return ThrottleDecision::Proceed;
        }

        let elapsed = now_ms.saturating_sub(self.window_start_ms);
        if elapsed >= self.window_ms {
            self.reset(now_ms);
            return ThrottleDecision::Reset;
        }

        let resume_at_ms = self.window_start_ms + self.window_ms + self.slack_ms;
        self.resume_at_ms = Some(resume_at_ms);
        info!(
            count = self.count,
            elapsed_ms = elapsed,
            resume_at_ms = resume_at_ms,
            "Action budget exhausted, pausing quoting"
        );
        ThrottleDecision::Pause { resume_at_ms }
    }

    /// Leave a pause if its time has come. Returns true when the window was
    /// reset by this call.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        match self.resume_at_ms {
            Some(at) if now_ms >= at => {
                self.reset(now_ms);
                true
            }
            _ => false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.resume_at_ms.is_some()
    }

    pub fn resume_at_ms(&self) -> Option<u64> {
        self.resume_at_ms
    }

    /// Actions taken in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    fn reset(&mut self, now_ms: u64) {
        self.count = 0;
        self.window_start_ms = now_ms;
        self.resume_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> ActionThrottle {
        ActionThrottle::new(16, 14, 1000, 10)
    }

    #[test]
    fn test_throttle_basic() {
        let mut t = throttle();
        t.begin_cycle(0);
        for _ in 0..5 {
            t.record_action();
        }
        assert!(t.can_quote());
        assert!(t.can_reprice());
        assert_eq!(t.count(), 5);
        assert_eq!(t.check_window(10), ThrottleDecision::Proceed);
    }

    #[test]
    fn test_ceiling_pauses_within_window() {
        let mut t = throttle();
        t.begin_cycle(100);
        for _ in 0..14 {
            t.record_action();
        }
        assert!(!t.can_quote());
        assert!(t.can_reprice());
        assert_eq!(
            t.check_window(400),
            ThrottleDecision::Pause { resume_at_ms: 1110 }
        );
        assert!(t.is_paused());

        assert!(!t.resume(1000));
        assert!(t.is_paused());
        assert!(t.resume(1110));
        assert!(!t.is_paused());
        assert_eq!(t.count(), 0);
    }

    #[test]
    fn test_ceiling_after_window_resets_immediately() {
        let mut t = throttle();
        t.begin_cycle(0);
        for _ in 0..14 {
            t.record_action();
        }
        assert_eq!(t.check_window(1500), ThrottleDecision::Reset);
        assert_eq!(t.count(), 0);
        assert!(!t.is_paused());
    }

    #[test]
    fn test_window_start_only_stamped_when_fresh() {
        let mut t = throttle();
        t.begin_cycle(0);
        t.record_action();
        // Later cycles in the same window keep the first start.
        t.begin_cycle(900);
        for _ in 0..13 {
            t.record_action();
        }
        assert_eq!(t.check_window(1000), ThrottleDecision::Reset);
    }

    #[test]
    fn test_reprice_ceiling() {
        let mut t = throttle();
        for _ in 0..17 {
            t.record_action();
        }
        assert!(!t.can_reprice());
    }
}
