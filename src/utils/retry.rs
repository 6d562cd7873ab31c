use std::future::Future;
use tracing::warn;
use crate::utils::time::sleep_with_jitter;

/// Ceiling for a single backoff step.
pub const MAX_DELAY_MS: u64 = 60_000;

fn next_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2).min(MAX_DELAY_MS)
}

/// Retries `operation` on transient errors, doubling the delay each time.
/// Non-retryable errors are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    mut retries: u32,
    base_delay_ms: u64,
    operation: F,
) -> crate::error::Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = crate::error::Result<T>>,
{
    let mut delay = base_delay_ms.min(MAX_DELAY_MS);

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if retries == 0 || !e.is_retryable() {
                    return Err(e);
                }

                warn!(
                    error = %e,
                    delay_ms = delay,
                    retries_left = retries,
                    "Transient failure, retrying"
                );

                retries -= 1;
                sleep_with_jitter(delay, delay / 2).await;
                delay = next_delay(delay);
            }
        }
    }
}
