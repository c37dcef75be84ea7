//! Tokio runtime implementation.

use std::future::Future;
use std::time::Duration;

use super::TimedOut;

/// Internal instant type for tokio.
#[derive(Debug, Clone, Copy)]
pub struct InstantInner(tokio::time::Instant);

impl InstantInner {
    pub fn now() -> Self {
        InstantInner(tokio::time::Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Run a future with a timeout using tokio.
pub async fn timeout_impl<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| TimedOut)
}
