//! Shared utility functions.

use std::future::Future;
use std::time::Duration;

/// Wraps a future with an optional timeout.
/// If `timeout` is `None`, the future runs without a timeout.
/// On expiry the error is built by `on_timeout` from the elapsed limit.
pub async fn with_optional_timeout<F, T, E>(
    future: F,
    timeout: Option<Duration>,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout {
        Some(duration) => tokio::time::timeout(duration, future)
            .await
            .map_err(|_| on_timeout(duration))?,
        None => future.await,
    }
}
