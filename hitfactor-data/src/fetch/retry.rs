//! Bounded retry with randomised pre-attempt jitter.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use serde_json::Value;
use thiserror::Error;

use crate::upstream::{Endpoint, MemberApi, TransportError};

/// Retry settings for upstream requests.
///
/// A jitter delay precedes every attempt, including the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    jitter_ms: RangeInclusive<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            jitter_ms: 32..=72,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_retries` additional attempts and the default jitter.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Policy that never sleeps between attempts.
    #[must_use]
    pub fn without_jitter(self) -> Self {
        self.with_jitter_ms(0, 0)
    }

    /// Sample jitter uniformly from `min..=max` milliseconds.
    #[must_use]
    pub fn with_jitter_ms(mut self, min: u64, max: u64) -> Self {
        self.jitter_ms = min.min(max)..=min.max(max);
        self
    }

    /// Retries allowed after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts per request.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait before the next attempt.
    #[must_use]
    pub fn jitter(&self) -> Duration {
        if *self.jitter_ms.end() == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.jitter_ms.clone()))
    }
}

/// A request that failed on every allowed attempt.
#[derive(Debug, Error)]
#[error("{endpoint} failed after {attempts} attempts: {source}")]
pub struct RetryExhausted {
    /// Endpoint that was requested.
    pub endpoint: Endpoint,
    /// Attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    #[source]
    pub source: TransportError,
}

/// Fetch `endpoint`, retrying transport and decode failures.
pub(crate) async fn fetch_with_retry<A>(
    api: &A,
    endpoint: &Endpoint,
    policy: &RetryPolicy,
) -> Result<Value, RetryExhausted>
where
    A: MemberApi + ?Sized,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let delay = policy.jitter();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match api.fetch(endpoint).await {
            Ok(value) => return Ok(value),
            Err(source) if attempt >= policy.max_attempts() => {
                return Err(RetryExhausted {
                    endpoint: endpoint.clone(),
                    attempts: attempt,
                    source,
                });
            }
            Err(err) => log::debug!("attempt {attempt} for {endpoint} failed: {err}"),
        }
    }
}
