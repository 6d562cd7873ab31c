use rand::Rng;
use std::future::Future;
use std::time::Duration;
use crate::error::{Error, Result};

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = rand::rng().random_range(0..=jitter_ms);
    tokio::time::sleep(Duration::from_millis(base_ms.saturating_add(jitter))).await;
}

/// Runs `future` under `limit`, mapping expiry to [`Error::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, service: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout { service }),
    }
}
