//! Token-bucket rate limiting for catalog requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::lock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sustained requests per second.
    pub requests_per_second: f64,
    /// Requests that may go out back to back from a full bucket.
    pub burst_size: u64,
    /// Longest an `acquire` waits for a token (0 = fail immediately).
    #[serde(with = "crate::serde_millis")]
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // TMDB allows roughly 50 requests per second per client.
        Self {
            requests_per_second: 40.0,
            burst_size: 40,
            max_wait: Duration::from_secs(5),
        }
    }
}

impl RateLimitConfig {
    pub fn with_requests_per_second(mut self, rps: f64) -> Self {
        self.requests_per_second = rps;
        self
    }

    pub fn with_burst_size(mut self, burst: u64) -> Self {
        self.burst_size = burst;
        self
    }

    pub fn with_max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct TokenBucket {
    config: RateLimitConfig,
    bucket: Mutex<Bucket>,
    total_requests: AtomicU64,
    total_waited: AtomicU64,
    total_rejected: AtomicU64,
}

impl TokenBucket {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            bucket: Mutex::new(Bucket {
                tokens: config.burst_size as f64,
                last_refill: Instant::now(),
            }),
            total_requests: AtomicU64::new(0),
            total_waited: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
        }
    }

    /// Takes a token if one is available. Otherwise returns the time until
    /// the next token.
    fn take(&self) -> Result<(), Duration> {
        let mut bucket = lock(&self.bucket);
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.config.requests_per_second)
            .min(self.config.burst_size as f64);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else if self.config.requests_per_second > 0.0 {
            let missing = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(missing / self.config.requests_per_second))
        } else {
            Err(Duration::MAX)
        }
    }

    /// Take a token without waiting.
    pub fn try_acquire(&self) -> bool {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if self.take().is_ok() {
            true
        } else {
            self.total_rejected.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Take a token, sleeping up to `max_wait` for one to become available.
    pub async fn acquire(&self) -> bool {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let mut waited = false;

        loop {
            let wait = match self.take() {
                Ok(()) => {
                    if waited {
                        self.total_waited.fetch_add(1, Ordering::Relaxed);
                    }
                    return true;
                }
                Err(wait) => wait,
            };

            let remaining = self.config.max_wait.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                self.total_rejected.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            waited = true;
            tokio::time::sleep(wait.min(remaining).min(Duration::from_millis(100))).await;
        }
    }

    pub fn stats(&self) -> RateLimitStats {
        RateLimitStats {
            available_tokens: lock(&self.bucket).tokens,
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_waited: self.total_waited.load(Ordering::Relaxed),
            total_rejected: self.total_rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitStats {
    pub available_tokens: f64,
    pub total_requests: u64,
    pub total_waited: u64,
    pub total_rejected: u64,
}

impl RateLimitStats {
    pub fn rejection_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_rejected as f64 / self.total_requests as f64
        }
    }
}
