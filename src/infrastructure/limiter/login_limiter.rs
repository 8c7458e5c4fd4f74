use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;

/// Per-client sliding-window limiter for login attempts. Every attempt is
/// recorded regardless of credential validity; once the window holds the
/// maximum number of attempts, further ones are refused until the oldest
/// attempt ages out.
#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<DashMap<String, Mutex<VecDeque<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        LoginRateLimiter {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            window,
        }
    }

    /// Records an attempt for `key` and returns whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let entry = self
            .attempts
            .entry(key.to_string())
            .or_insert_with(|| Mutex::new(VecDeque::new()));
        let mut window = entry.lock();

        while let Some(front) = window.front() {
            if now.duration_since(*front) > self.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() >= self.max_attempts {
            return false;
        }

        window.push_back(now);
        true
    }

    /// Drops entries whose attempts have all aged out of the window.
    pub fn purge_stale(&self) -> usize {
        let now = Instant::now();
        let before = self.attempts.len();
        self.attempts.retain(|_, attempts| {
            let attempts = attempts.lock();
            attempts
                .back()
                .is_some_and(|last| now.duration_since(*last) <= self.window)
        });
        before - self.attempts.len()
    }
}
