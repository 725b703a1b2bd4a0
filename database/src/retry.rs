use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::sleep;

pub type BoxedAttempt<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Run `operation` up to `1 + max_retries` times, doubling the delay after
/// each failure. The last error is returned once the budget is spent.
pub async fn retry_with_backoff<F, T, E>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> BoxedAttempt<T, E>,
    E: std::fmt::Display,
{
    let mut delay = initial_delay;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(attempt, %e, "Store operation failed, retrying in {delay:?}");
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retries_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<usize, String> = retry_with_backoff(
            move || {
                let counter = counter.clone();
                Box::pin(async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err("not yet".to_string())
                    } else {
                        Ok(n)
                    }
                })
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let result: Result<(), String> = retry_with_backoff(
            || Box::pin(async { Err("down".to_string()) }),
            1,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Err("down".to_string()));
    }
}
