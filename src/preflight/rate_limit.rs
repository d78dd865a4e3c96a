//! Request throttling for the HTTP aggregators, built on governor.
//!
//! Public quote and trade-history APIs rate-limit aggressively. Each client
//! owns one throttle and waits on it before every request.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::{debug, instrument};

const FALLBACK_REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// Direct (unkeyed) rate limiter shared by all requests of one client.
pub struct RequestThrottle {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: u32,
}

impl RequestThrottle {
    /// A quota of zero falls back to a conservative default.
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(FALLBACK_REQUESTS_PER_SECOND);

        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            requests_per_second: per_second.get(),
        }
    }

    /// Wait until a request may be sent.
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        if self.limiter.check().is_err() {
            debug!("Rate limit reached ({} req/s), waiting", self.requests_per_second);
            self.limiter.until_ready().await;
        }
    }

    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_zero_quota_falls_back() {
        let throttle = RequestThrottle::new(0);
        assert_eq!(throttle.requests_per_second(), 5);
    }

    #[tokio::test]
    async fn test_burst_within_quota_is_immediate() {
        let throttle = RequestThrottle::new(10);
        let start = Instant::now();
        for _ in 0..5 {
            throttle.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_exceeding_quota_waits() {
        let throttle = RequestThrottle::new(2);
        let start = Instant::now();
        for _ in 0..3 {
            throttle.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
