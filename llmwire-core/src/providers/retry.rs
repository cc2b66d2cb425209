//! Retry policy and HTTP status classification
//!
//! [`RetryState`] hands out exponential-backoff delays until the configured
//! retry budget is spent. [`classify_status`] decides which HTTP responses
//! are worth another attempt.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fraction of the computed delay used as the jitter range (plus or minus)
const JITTER_FACTOR: f64 = 0.1;

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay (milliseconds)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Randomize each delay by up to 10% in either direction
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            ..Default::default()
        }
    }

    /// A single attempt, never retried
    pub fn no_retry() -> Self {
        Self::new(0, 0)
    }

    /// Retries with zero delay; used where real sleeping is unwanted
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            jitter: false,
            ..Self::new(max_retries, 0)
        }
    }

    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `retry` (zero-based), without jitter
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = delay.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Delay before retry number `retry`, with jitter applied if enabled
    pub fn compute_delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let millis = base.as_millis() as f64;
        let range = millis * JITTER_FACTOR;
        let jittered = rand::thread_rng().gen_range(millis - range..=millis + range);
        Duration::from_millis(jittered.max(0.0) as u64)
    }
}

/// Per-call retry bookkeeping
#[derive(Debug, Clone)]
pub struct RetryState {
    config: RetryConfig,
    retries: u32,
}

impl RetryState {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, retries: 0 }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Retries granted so far
    pub fn attempts(&self) -> u32 {
        self.retries
    }

    pub fn reset(&mut self) {
        self.retries = 0;
    }

    /// The delay before the next retry, or `None` once `max_retries` have
    /// been granted
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.retries >= self.config.max_retries {
            return None;
        }
        let delay = self.config.compute_delay(self.retries);
        self.retries += 1;
        Some(delay)
    }
}

/// How an HTTP status should be treated by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Transient: rate limiting or a server-side failure
    Retryable,
    /// Returned to the caller as is
    Terminal,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        429 | 500 | 502 | 503 | 504 => StatusClass::Retryable,
        _ => StatusClass::Terminal,
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    classify_status(status) == StatusClass::Retryable
}
