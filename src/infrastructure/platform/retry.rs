//! Explicit retry policy for platform calls
//!
//! Max attempts, linear backoff and a retryable-error predicate are all
//! explicit; the wrapped operation stays a single closure instead of
//! nested error handling.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy with linear backoff (base, 2*base, ...)
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Platform default: two retries at 1s and 2s
    pub fn platform_default() -> Self {
        Self::new(2, Duration::from_secs(1))
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run an operation, retrying errors the predicate accepts.
    ///
    /// The final error is returned unchanged once retries are exhausted
    /// or the predicate rejects it.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation_name: &str,
        retryable: impl Fn(&E) -> bool,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_retries || !retryable(&error) {
                        return Err(error);
                    }

                    attempt += 1;
                    let delay = self.base_delay * attempt;
                    warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying platform call"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_retryable_failures() {
        let policy = RetryPolicy::platform_default();
        let calls = AtomicU32::new(0);

        let result = policy
            .run("create", |_: &String| true, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(format!("boom {}", n))
                    } else {
                        Ok("created")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "created");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retries() {
        let policy = RetryPolicy::platform_default();
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .run("create", |_| true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("persistent".to_string()) }
            })
            .await;

        assert!(result.is_err());
        // Initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let policy = RetryPolicy::platform_default();
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .run("create", |_| false, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("validation".to_string()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
