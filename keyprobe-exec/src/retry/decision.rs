use std::fmt;
use std::time::Duration;

use crate::retry::config::{is_retryable_status, RetryConfig};

/// What a single attempt produced, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Status(u16),
    TransportFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    NotRetryable,
    AttemptsExhausted,
    NetworkFailure,
    HttpStatus(u16),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::NotRetryable => f.write_str("not retryable"),
            RetryReason::AttemptsExhausted => f.write_str("attempts exhausted"),
            RetryReason::NetworkFailure => f.write_str("transport failure"),
            RetryReason::HttpStatus(s) => write!(f, "HTTP {s}"),
        }
    }
}

/// Decide whether to send another attempt.
///
/// - `attempt_no`: 1-based number of the attempt that just finished.
/// - `outcome`: transport failure, or the status of a completed exchange.
///
/// Only transport failures, 5xx and 429 are retried. Whether the status satisfies the
/// template's success criteria plays no part here.
pub fn decide_retry(cfg: &RetryConfig, attempt_no: u32, outcome: AttemptOutcome) -> RetryDecision {
    let reason = match outcome {
        AttemptOutcome::TransportFailure => RetryReason::NetworkFailure,
        AttemptOutcome::Status(status) if is_retryable_status(status) => {
            RetryReason::HttpStatus(status)
        }
        AttemptOutcome::Status(_) => {
            return RetryDecision::Stop {
                reason: RetryReason::NotRetryable,
            };
        }
    };

    if attempt_no >= cfg.max_attempts() {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }

    RetryDecision::RetryAfter {
        delay: cfg.delay,
        reason,
    }
}
