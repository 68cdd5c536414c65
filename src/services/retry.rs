use std::{fmt::Display, future::Future, time::Duration};

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Fixed-delay retry: no backoff growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1), // Should be > 0
            delay,
        }
    }

    /// Runs `operation` until it succeeds or the attempts run out, returning
    /// the last error. The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    log::warn!(
                        "Attempt {}/{} failed, retrying in {:?}. Error: {}",
                        attempt,
                        self.max_attempts,
                        self.delay,
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!(
                        "Attempt {}/{} failed, giving up. Error: {}",
                        attempt,
                        self.max_attempts,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }
}
