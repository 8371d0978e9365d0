//! Retry policy for record submission

use std::time::Duration;

/// Retry configuration for one record's submission
///
/// Only timeouts and transport-level failures are retried; a received HTTP
/// response is returned to the caller whatever its status. `max_attempts`
/// must be at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per record, counting the first one
    pub max_attempts: u32,
    /// Fixed sleep between attempts
    pub backoff: Duration,
    /// Timeout applied to each individual request
    pub request_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(45),
        }
    }
}

impl RetryConfig {
    /// Single attempt, no sleeping (for tests)
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
            request_timeout: Duration::from_secs(45),
        }
    }
}
