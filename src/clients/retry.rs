//! Retry policy for transport failures and rate limiting.
//!
//! Both failure kinds are retried with exponential backoff starting at a
//! per-kind base delay. Jitter is only ever added, so a rate-limited request
//! never waits less than [`RetryPolicy::rate_limit_delay`].

use std::time::Duration;

use rand::Rng;

use crate::clients::errors::RetryReason;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default base delay after a transport failure.
pub const DEFAULT_TRANSPORT_DELAY: Duration = Duration::from_secs(60);
/// Default base delay after a 429 response.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(120);
/// Default ceiling for the exponential component.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(960);

/// Fraction of the computed delay used as the jitter upper bound.
const JITTER_RATIO: f64 = 0.1;
/// Longest `Retry-After` honoured, in seconds.
const MAX_RETRY_AFTER_SECS: f64 = 86_400.0;

/// Controls how often and how long the client waits before re-issuing a request.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_http_client::clients::{RetryPolicy, RetryReason};
///
/// let policy = RetryPolicy::default().with_jitter(false);
/// assert_eq!(policy.delay_for(RetryReason::RateLimited, 1, None), Duration::from_secs(120));
/// assert_eq!(policy.delay_for(RetryReason::RateLimited, 2, None), Duration::from_secs(240));
/// assert_eq!(policy.delay_for(RetryReason::Transport, 1, None), Duration::from_secs(60));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Base delay after a transport failure.
    pub transport_delay: Duration,
    /// Base delay after a 429 response.
    pub rate_limit_delay: Duration,
    /// Multiplier applied per additional attempt.
    pub backoff_factor: f64,
    /// Upper bound for the exponential component. Never below the base delay.
    pub max_delay: Duration,
    /// Whether to add random jitter on top of the computed delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transport_delay: DEFAULT_TRANSPORT_DELAY,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
            backoff_factor: 2.0,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// A policy that retries up to `max_attempts` times without waiting.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            transport_delay: Duration::ZERO,
            rate_limit_delay: Duration::ZERO,
            backoff_factor: 1.0,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Sets the attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the base delays for transport failures and rate limiting.
    #[must_use]
    pub const fn with_delays(mut self, transport: Duration, rate_limit: Duration) -> Self {
        self.transport_delay = transport;
        self.rate_limit_delay = rate_limit;
        self
    }

    /// Enables or disables jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the effective attempt budget (at least one).
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Returns the base delay for a failure kind.
    #[must_use]
    pub const fn base_delay(&self, reason: RetryReason) -> Duration {
        match reason {
            RetryReason::Transport => self.transport_delay,
            RetryReason::RateLimited => self.rate_limit_delay,
        }
    }

    /// Computes the wait before the retry that follows failed attempt `attempt`
    /// (1-based).
    ///
    /// `retry_after` is the server's `Retry-After` value in seconds; the result
    /// is never shorter than it. Delays too large for a [`Duration`] saturate
    /// at [`Duration::MAX`].
    #[must_use]
    pub fn delay_for(&self, reason: RetryReason, attempt: u32, retry_after: Option<f64>) -> Duration {
        let base = self.base_delay(reason);
        let ceiling = self.max_delay.max(base).as_secs_f64();
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let factor = self.backoff_factor.max(1.0).powi(exponent);

        let mut secs = (base.as_secs_f64() * factor).min(ceiling);
        if let Some(server) = retry_after.filter(|s| s.is_finite() && *s > 0.0) {
            secs = secs.max(server.min(MAX_RETRY_AFTER_SECS));
        }
        if self.jitter && secs > 0.0 {
            secs += rand::thread_rng().gen_range(0.0..=secs * JITTER_RATIO);
        }

        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}
