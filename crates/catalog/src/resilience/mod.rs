//! Resilience for outbound catalog calls: circuit breaker, rate limiting and
//! retry with backoff.
//!
//! Every piece is owned by the client instance that uses it. Two clients
//! pointed at the same catalog do not share breaker or bucket state.

mod circuit_breaker;
mod rate_limit;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use rate_limit::{RateLimitConfig, RateLimitStats, TokenBucket};
pub use retry::{execute_with_retry, RetryConfig, RetryResult};

use std::sync::{Mutex, MutexGuard};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
