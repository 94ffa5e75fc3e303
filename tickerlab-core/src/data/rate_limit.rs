//! Minimum-interval rate limiter for the data provider.
//!
//! The provider allows N calls per minute. The limiter spaces calls at least
//! `60 / N` seconds apart, measured from the end of the previous wait. One
//! limiter is shared by every symbol fetched through a client.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Blocking limiter owning its own "last call" clock.
///
/// The mutex is held across check, sleep and update, so concurrent callers
/// queue behind each other instead of computing the same wait window.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with an explicit minimum interval between calls.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Limiter allowing `calls_per_minute` calls per minute.
    pub fn per_minute(calls_per_minute: u32) -> Self {
        assert!(calls_per_minute >= 1, "rate limit must be >= 1 call per minute");
        Self::new(Duration::from_secs(60) / calls_per_minute)
    }

    /// Minimum spacing between two calls.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until a call is allowed, then record it. Returns how long the
    /// caller was made to sleep.
    pub fn acquire(&self) -> Duration {
        let mut last = self.last_call.lock().unwrap_or_else(PoisonError::into_inner);

        let wait = match *last {
            Some(prev) => self.interval.saturating_sub(prev.elapsed()),
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            debug!(wait_secs = wait.as_secs_f64(), "rate limit: waiting");
            std::thread::sleep(wait);
        }

        *last = Some(Instant::now());
        wait
    }

    /// Time until the next call would be allowed (zero if allowed now).
    pub fn remaining(&self) -> Duration {
        let last = self.last_call.lock().unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(prev) => self.interval.saturating_sub(prev.elapsed()),
            None => Duration::ZERO,
        }
    }
}
