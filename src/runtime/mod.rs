//! Runtime-agnostic async abstractions.
//!
//! The bridge client only needs three things from an async runtime: a way to
//! bound a request with a timeout, a monotonic clock for the sensor cache and
//! an async mutex for state shared between bridge handles. This module picks
//! them from the runtime selected by feature flag.
//!
//! # Feature Flags
//!
//! Enable one of the following features to select your runtime:
//!
//! - `runtime-tokio` (default) - Use the tokio runtime
//! - `runtime-async-std` - Use the async-std runtime
//! - `runtime-smol` - Use the smol runtime
//!
//! The bundled [`HttpTransport`](crate::HttpTransport) is built on reqwest and
//! therefore requires tokio. With another runtime, supply your own
//! [`Transport`](crate::Transport).
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! # Using async-std with a custom transport
//! huegely-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;

#[cfg(feature = "runtime-smol")]
mod smol_impl;

// Re-export the active runtime's types
#[cfg(feature = "runtime-tokio")]
use tokio_impl::*;

#[cfg(feature = "runtime-async-std")]
use async_std_impl::*;

#[cfg(feature = "runtime-smol")]
use smol_impl::*;

/// A boxed future type for runtime abstraction.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Run a future with a timeout.
///
/// Returns `Err(TimedOut)` if the timeout expires before the future completes.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    timeout_impl(duration, future).await
}

/// Error returned when a timeout expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut;

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation timed out")
    }
}

impl std::error::Error for TimedOut {}

/// A measurement of monotonically increasing time.
#[derive(Debug, Clone, Copy)]
pub struct Instant(InstantInner);

impl Instant {
    /// Returns the current instant.
    pub fn now() -> Self {
        Instant(InstantInner::now())
    }

    /// Returns the duration elapsed since this instant was created.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

// Async mutex re-export
#[cfg(feature = "runtime-tokio")]
pub use tokio::sync::Mutex;

#[cfg(feature = "runtime-async-std")]
pub use async_std::sync::Mutex;

#[cfg(feature = "runtime-smol")]
pub use async_lock::Mutex;

// Compile-time check to ensure exactly one runtime is selected
#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-async-std\" are mutually exclusive");

#[cfg(all(feature = "runtime-tokio", feature = "runtime-smol"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(feature = "runtime-async-std", feature = "runtime-smol"))]
compile_error!("Features \"runtime-async-std\" and \"runtime-smol\" are mutually exclusive");

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_expires() {
        let result = timeout(Duration::from_millis(10), futures::future::pending::<()>()).await;
        assert_eq!(result, Err(TimedOut));
    }

    #[tokio::test]
    async fn test_timeout_completes() {
        let result = timeout(Duration::from_secs(1), async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_instant_elapsed() {
        let start = Instant::now();
        assert!(start.elapsed() < Duration::from_secs(60));
    }
}
