use std::time::Duration;

use keyprobe_core::ErrorHandling;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryConfig {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
}

impl RetryConfig {
    pub fn from_error_handling(eh: &ErrorHandling) -> Self {
        Self {
            max_retries: eh.max_retries,
            delay: Duration::from_secs(eh.retry_delay),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Server errors and rate limiting.
pub fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 429
}
