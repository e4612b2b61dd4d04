//! Request-rate governor
//!
//! Callers throttle outbound requests before feeding responses to a differ.
//! The differ itself never touches the governor.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Default length of the sliding window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Throttles callers to a fixed quota per time window.
pub trait RateGovernor: Send + Sync {
    /// Block until one more unit of quota may be consumed, then consume it.
    fn pause(&self);

    /// Units currently counted within the active window.
    fn current_load(&self) -> usize;
}

// =============================================================================
// SlidingWindowLimiter
// =============================================================================

/// At most `rate` calls within any `window`.
///
/// Keeps the timestamps of the calls inside the window. When `rate` of
/// them are still live, [`pause`](RateGovernor::pause) sleeps until the
/// oldest one expires. Callers of `pause` take turns through a separate
/// lock; the timestamp queue is only locked briefly, never across the
/// sleep, so [`current_load`](RateGovernor::current_load) does not block
/// behind a waiting caller.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    rate: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
    turn: Mutex<()>,
}

impl SlidingWindowLimiter {
    /// `rate` calls per `window`. A rate of 0 disables throttling.
    pub fn new(rate: usize, window: Duration) -> Self {
        Self {
            rate,
            window,
            calls: Mutex::new(VecDeque::with_capacity(rate)),
            turn: Mutex::new(()),
        }
    }

    /// `rate` calls per minute.
    pub fn per_minute(rate: usize) -> Self {
        Self::new(rate, DEFAULT_WINDOW)
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&self, calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = calls.front() {
            if now.duration_since(oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

impl RateGovernor for SlidingWindowLimiter {
    fn pause(&self) {
        if self.rate == 0 {
            return;
        }

        let _turn = self.turn.lock();
        let wait = {
            let mut calls = self.calls.lock();
            let now = Instant::now();
            self.prune(&mut calls, now);
            if calls.len() >= self.rate {
                calls
                    .front()
                    .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
            } else {
                None
            }
        };

        if let Some(wait) = wait {
            debug!(?wait, rate = self.rate, "rate quota exhausted, waiting");
            thread::sleep(wait);
        }

        let mut calls = self.calls.lock();
        let now = Instant::now();
        self.prune(&mut calls, now);
        calls.push_back(now);
    }

    fn current_load(&self) -> usize {
        let mut calls = self.calls.lock();
        self.prune(&mut calls, Instant::now());
        calls.len()
    }
}
