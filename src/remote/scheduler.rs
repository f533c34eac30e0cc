//! Tick driven reset of the selection back to `all`
//!
//! ```text
//! Disabled (timeout 0) ── never fires
//!
//! Enabled ── tick ──► remaining - 1 ──► remaining <= 0 ? ── fire, reload to max
//!    ▲                                        │
//!    └──────────────── no ────────────────────┘
//! ```
//!
//! The scheduler only counts; the heartbeat that drives [`ResetScheduler::tick`]
//! lives in the host.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScheduler {
    Disabled,
    Enabled { max_ticks: u32, remaining: i64 },
}

impl ResetScheduler {
    /// A timeout of 0 ticks disables the reset permanently
    pub fn new(timeout_ticks: u32) -> Self {
        match timeout_ticks {
            0 => ResetScheduler::Disabled,
            max_ticks => ResetScheduler::Enabled {
                max_ticks,
                remaining: i64::from(max_ticks),
            },
        }
    }

    /// Counts one tick down. Returns `true` when the reset is due; the counter
    /// is already reloaded at that point.
    pub fn tick(&mut self) -> bool {
        match self {
            ResetScheduler::Disabled => false,
            ResetScheduler::Enabled {
                max_ticks,
                remaining,
            } => {
                *remaining -= 1;
                if *remaining <= 0 {
                    *remaining = i64::from(*max_ticks);
                    true
                } else {
                    trace!("Selection reset in {} ticks", remaining);
                    false
                }
            }
        }
    }

    /// Restarts the countdown from the configured maximum
    pub fn reload(&mut self) {
        if let ResetScheduler::Enabled {
            max_ticks,
            remaining,
        } = self
        {
            *remaining = i64::from(*max_ticks);
        }
    }

    pub fn remaining(&self) -> Option<i64> {
        match self {
            ResetScheduler::Disabled => None,
            ResetScheduler::Enabled { remaining, .. } => Some(*remaining),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ResetScheduler::Enabled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_fires() {
        let mut scheduler = ResetScheduler::new(0);
        assert!(!scheduler.is_enabled());
        for _ in 0..1000 {
            assert!(!scheduler.tick());
        }
        assert_eq!(scheduler.remaining(), None);
    }

    #[test]
    fn test_fires_after_max_ticks_and_reloads() {
        let mut scheduler = ResetScheduler::new(3);
        assert!(!scheduler.tick());
        assert!(!scheduler.tick());
        assert!(scheduler.tick());
        assert_eq!(scheduler.remaining(), Some(3));

        assert!(!scheduler.tick());
        assert!(!scheduler.tick());
        assert!(scheduler.tick());
    }

    #[test]
    fn test_single_tick_timeout_fires_every_tick() {
        let mut scheduler = ResetScheduler::new(1);
        assert!(scheduler.tick());
        assert!(scheduler.tick());
    }

    #[test]
    fn test_reload_restarts_countdown() {
        let mut scheduler = ResetScheduler::new(3);
        scheduler.tick();
        scheduler.tick();
        assert_eq!(scheduler.remaining(), Some(1));

        scheduler.reload();
        assert_eq!(scheduler.remaining(), Some(3));
        assert!(!scheduler.tick());
    }
}
