mod config;
mod decision;

pub use config::{is_retryable_status, RetryConfig};
pub use decision::{decide_retry, AttemptOutcome, RetryDecision, RetryReason};
