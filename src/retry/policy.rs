// ABOUTME: RetryPolicy - exponential backoff with jitter over a bounded
// ABOUTME: number of attempts, gated by a per-call eligibility predicate.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Bounded-attempt retry configuration with exponential backoff and jitter.
///
/// The policy is stateless and reusable; each `execute` call keeps its own
/// attempt counter. Only errors accepted by the eligibility predicate are
/// retried, and the final unsuccessful attempt surfaces the underlying error
/// unchanged.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    min_wait: Duration,
    max_wait: Duration,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and default waits
    /// (1s minimum, 10s maximum, up to 2s jitter).
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Self {
        assert!(max_attempts >= 1, "max_attempts must be at least 1");

        Self {
            max_attempts,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(10),
            max_jitter: Duration::from_secs(2),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Set the minimum wait before the first retry.
    pub fn min_wait(mut self, wait: Duration) -> Self {
        self.min_wait = wait;
        self
    }

    /// Set the cap on the exponential wait.
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }

    /// Set the maximum random jitter added to each wait.
    pub fn max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before attempt `n` (1-based): zero for the first attempt,
    /// otherwise `min(max_wait, min_wait * 2^(n-2))` plus uniform jitter
    /// in `[0, max_jitter]`.
    pub fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }

        let base = self.min_wait.as_secs_f64() * 2f64.powi(attempt as i32 - 2);
        let capped = base.min(self.max_wait.as_secs_f64());

        let jitter = if self.max_jitter.is_zero() {
            0.0
        } else {
            rand::thread_rng().gen_range(0.0..=self.max_jitter.as_secs_f64())
        };

        Duration::from_secs_f64(capped + jitter)
    }

    /// Run `operation` until it succeeds, an ineligible error occurs, or the
    /// attempt budget is exhausted. Each retry logs the attempt number and
    /// the error that preceded it.
    pub async fn execute<T, E, Op, Fut, P>(&self, mut operation: Op, retryable: P) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts || !retryable(&err) {
                        return Err(err);
                    }

                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "retrying after failure"
                    );
                    tokio::time::sleep(self.delay_before_attempt(attempt)).await;
                }
            }
        }
    }

    /// Blocking variant of [`execute`](Self::execute) with identical timing.
    ///
    /// Runs the retry loop on an owned current-thread runtime. Must not be
    /// called from within an async context; tokio will panic rather than
    /// block a runtime thread.
    pub fn execute_blocking<T, E, Op, P>(&self, mut operation: Op, retryable: P) -> Result<T, E>
    where
        Op: FnMut() -> Result<T, E>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("Failed to create retry runtime");

        runtime.block_on(self.execute(
            || {
                let result = operation();
                async move { result }
            },
            retryable,
        ))
    }
}
