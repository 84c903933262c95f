// In-memory sliding-window rate limiter for the HTTP surface.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Which budget a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitType {
    /// Pings on the keep-alive endpoint (one every two seconds).
    KeepAlive,
    /// Relayed commands per author.
    Commands,
}

impl RateLimitType {
    /// Accepted events allowed inside one window.
    pub fn max_count(&self) -> usize {
        match self {
            RateLimitType::KeepAlive => 1,
            RateLimitType::Commands => 20,
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            RateLimitType::KeepAlive => Duration::from_secs(2),
            RateLimitType::Commands => Duration::from_secs(60),
        }
    }
}

impl fmt::Display for RateLimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitType::KeepAlive => write!(f, "keep-alive pings per 2 seconds"),
            RateLimitType::Commands => write!(f, "commands per minute"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Rate limit exceeded: max {max} {limit_type}")]
pub struct RateLimitError {
    pub limit_type: RateLimitType,
    pub max: usize,
}

type LimitKey = (String, RateLimitType);

/// Accepted-event timestamps per (caller, budget), oldest first.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<LimitKey, VecDeque<Instant>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event for `key` if its budget allows it.
    ///
    /// Rejected events are not recorded.
    pub fn check_limit(&self, key: &str, limit_type: RateLimitType) -> Result<(), RateLimitError> {
        self.check_limit_at(key, limit_type, Instant::now())
    }

    fn check_limit_at(
        &self,
        key: &str,
        limit_type: RateLimitType,
        now: Instant,
    ) -> Result<(), RateLimitError> {
        let mut windows = self.windows.lock().unwrap();
        let events = windows.entry((key.to_string(), limit_type)).or_default();
        expire(events, limit_type.window(), now);

        let max = limit_type.max_count();
        if events.len() >= max {
            return Err(RateLimitError { limit_type, max });
        }
        events.push_back(now);
        Ok(())
    }

    /// Events currently counted against `key`.
    pub fn current_count(&self, key: &str, limit_type: RateLimitType) -> usize {
        let mut windows = self.windows.lock().unwrap();
        match windows.get_mut(&(key.to_string(), limit_type)) {
            Some(events) => {
                expire(events, limit_type.window(), Instant::now());
                events.len()
            }
            None => 0,
        }
    }
}

fn expire(events: &mut VecDeque<Instant>, window: Duration, now: Instant) {
    while let Some(oldest) = events.front() {
        if now.saturating_duration_since(*oldest) < window {
            break;
        }
        events.pop_front();
    }
}
