//! Fixed-budget retry combinator.
//!
//! Attempts run back to back with identical inputs; the operation must be
//! idempotent. There is no backoff.

use std::future::Future;

/// Number of attempts allowed, including the first one. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget(u32);

impl AttemptBudget {
    pub fn new(attempts: u32) -> Self {
        Self(attempts.max(1))
    }

    pub fn attempts(&self) -> u32 {
        self.0
    }
}

/// Every attempt failed; `last` is the final attempt's error.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Run `op` until it succeeds or the budget is spent. `op` receives the
/// 1-based attempt number.
pub async fn retry_with_budget<T, E, F, Fut>(
    budget: AttemptBudget,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < budget.attempts() => {
                tracing::debug!(attempt, error = %err, "attempt failed, retrying");
                attempt += 1;
            }
            Err(err) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last: err,
                });
            }
        }
    }
}
