//! Retry state machine for completion calls

use docbrief_common::{ApiError, ApiFailure, AppConfig};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::sleeper::Sleeper;

/// Retry budget and wait schedule for one logical API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per call, including the first
    pub max_attempts: u32,

    /// Wait after a non-429 failure
    pub retry_delay: Duration,

    /// Step of the linear 429 backoff
    pub rate_limit_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            rate_limit_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            retry_delay: config.retry_delay(),
            rate_limit_backoff: config.backoff_multiplier(),
        }
    }

    /// Wait after a 429 on the zero-based `attempt_index`: 2s, 4s, 6s, ...
    pub fn rate_limit_wait(&self, attempt_index: u32) -> Duration {
        self.rate_limit_backoff * (attempt_index + 1)
    }
}

/// Result of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    RateLimited,
    Failed(ApiFailure),
}

/// Drive `attempt` until it succeeds or the policy's budget is spent
///
/// A 429 consumes an attempt slot like any other failure. The final attempt
/// is never followed by a wait.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut attempt: F,
) -> Result<String, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome>,
{
    let max_attempts = policy.max_attempts.max(1);

    for index in 0..max_attempts {
        let is_last = index + 1 == max_attempts;

        match attempt(index).await {
            AttemptOutcome::Success(text) => return Ok(text),
            AttemptOutcome::RateLimited => {
                if is_last {
                    break;
                }
                let wait = policy.rate_limit_wait(index);
                warn!(
                    "Rate limited (attempt {}/{}). Backing off for {:?}",
                    index + 1,
                    max_attempts,
                    wait
                );
                sleeper.sleep(wait).await;
            }
            AttemptOutcome::Failed(cause) => {
                if is_last {
                    return Err(ApiError::Failed {
                        attempts: max_attempts,
                        cause,
                    });
                }
                warn!(
                    "Completion request failed (attempt {}/{}): {}. Retrying in {:?}...",
                    index + 1,
                    max_attempts,
                    cause,
                    policy.retry_delay
                );
                sleeper.sleep(policy.retry_delay).await;
            }
        }
    }

    Err(ApiError::RetriesExhausted {
        attempts: max_attempts,
    })
}
