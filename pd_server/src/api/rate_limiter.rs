//! Rate limiter for WebSocket frames.
//!
//! Each socket carries a burst limiter and a sustained limiter; a frame is
//! processed only when both admit it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::WebSocketConfig;

/// Sliding-window limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Admission times still inside the window
    timestamps: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Allow `max_requests` per `window`.
    ///
    /// # Example
    ///
    /// ```
    /// use pd_server::api::rate_limiter::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let mut limiter = RateLimiter::new(2, Duration::from_secs(1));
    /// assert!(limiter.check());
    /// assert!(limiter.check());
    /// assert!(!limiter.check());
    /// ```
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    /// Short-window limiter from socket config
    pub fn burst(config: &WebSocketConfig) -> Self {
        Self::new(
            config.burst_limit,
            Duration::from_secs(config.burst_window_secs),
        )
    }

    /// Long-window limiter from socket config
    pub fn sustained(config: &WebSocketConfig) -> Self {
        Self::new(
            config.sustained_limit,
            Duration::from_secs(config.sustained_window_secs),
        )
    }

    /// Admit a request now if the window has room.
    pub fn check(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    fn check_at(&mut self, now: Instant) -> bool {
        while self
            .timestamps
            .front()
            .is_some_and(|ts| now.duration_since(*ts) >= self.window)
        {
            self.timestamps.pop_front();
        }

        if self.timestamps.len() >= self.max_requests {
            return false;
        }

        self.timestamps.push_back(now);
        true
    }

    /// Requests still allowed in the current window
    pub fn remaining(&self) -> usize {
        self.max_requests.saturating_sub(self.timestamps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.check());
        }
        assert!(!limiter.check());
        assert_eq!(limiter.remaining(), 0);
    }

    #[test]
    fn test_rate_limiter_window_slides() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(1));
        let start = Instant::now();

        assert!(limiter.check_at(start));
        assert!(limiter.check_at(start + Duration::from_millis(500)));
        assert!(!limiter.check_at(start + Duration::from_millis(900)));

        // First admission has aged out
        assert!(limiter.check_at(start + Duration::from_millis(1000)));
        assert!(!limiter.check_at(start + Duration::from_millis(1200)));
        assert!(limiter.check_at(start + Duration::from_millis(1500)));
    }

    #[test]
    fn test_limiters_from_config() {
        let config = WebSocketConfig {
            burst_limit: 1,
            sustained_limit: 5,
            ..WebSocketConfig::default()
        };

        let mut burst = RateLimiter::burst(&config);
        assert!(burst.check());
        assert!(!burst.check());

        let sustained = RateLimiter::sustained(&config);
        assert_eq!(sustained.remaining(), 5);
    }
}
