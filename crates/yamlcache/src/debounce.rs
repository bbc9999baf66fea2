//! Suppression of duplicate change notifications.
//!
//! File watchers frequently deliver the same modification more than once:
//! one save may surface as several write events a few milliseconds apart.
//! A [`Debouncer`] remembers when it last let a notification through and
//! drops anything arriving within its threshold of that moment.
//!
//! Each [`YamlConfig`](crate::YamlConfig) owns its own debouncer by
//! default, so a change to one file never hides a near-simultaneous change
//! to another. Coordinators that should share one window can be given the
//! same `Arc<Debouncer>` through
//! [`YamlConfigBuilder::debouncer`](crate::YamlConfigBuilder::debouncer).
//!
//! The threshold assumes duplicates arrive within a short, bounded window
//! of the genuine event. Use [`Duration::ZERO`] to accept every
//! notification when the platform watcher does not duplicate.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::defaults;

/// Time-window filter for change notifications.
#[derive(Debug)]
pub struct Debouncer {
    threshold: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl Debouncer {
    /// Create a debouncer that drops notifications closer than `threshold`
    /// to the last accepted one.
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_accepted: Mutex::new(None),
        }
    }

    /// The suppression window.
    #[must_use]
    pub const fn threshold(&self) -> Duration {
        self.threshold
    }

    /// When the last notification was accepted, if ever.
    #[must_use]
    pub fn last_accepted(&self) -> Option<Instant> {
        *self.last_accepted.lock()
    }

    /// Decide on a notification arriving now.
    ///
    /// Returns `true` and records the time when the notification should be
    /// acted upon; `false` when it is a duplicate.
    pub fn try_accept(&self) -> bool {
        self.try_accept_at(Instant::now())
    }

    /// Decide on a notification arriving at `now`.
    ///
    /// The check and the update happen under one lock, so two racing
    /// notifications can never both be accepted inside one window.
    pub fn try_accept_at(&self, now: Instant) -> bool {
        let mut last = self.last_accepted.lock();

        match *last {
            Some(prev) if now.saturating_duration_since(prev) < self.threshold => false,

            _ => {
                *last = Some(now);
                true
            }
        }
    }

    /// Forget the last accepted notification.
    pub fn reset(&self) {
        *self.last_accepted.lock() = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(defaults::DEBOUNCE)
    }
}
