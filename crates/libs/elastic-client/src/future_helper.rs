use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retries `action` up to `max_retry` times after the first failure, doubling
/// the wait between attempts.
pub async fn with_backoff<F, Fut, T, E>(
    mut action: F,
    max_retry: u8,
    first_wait: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut wait = first_wait;

    loop {
        match action().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_retry {
                    return Err(err);
                }
                attempt += 1;
                warn!(
                    "operation failed (attempt {}/{}), retrying in {:?}: {}",
                    attempt, max_retry, wait, err
                );
                tokio::time::sleep(wait).await;
                wait *= 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicUsize::new(0);

        let res: Result<u32, String> = with_backoff(
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err("boom".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(res, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);

        let res: Result<u32, String> = with_backoff(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom".to_string()) }
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(res, Err("boom".to_string()));
        // first attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
