// src/services/rate_limit.rs
// DOCUMENTATION: Concurrency gate for upstream Google API calls
// PURPOSE: Bound the number of in-flight provider requests

use crate::errors::SearchError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate limiting concurrent upstream calls.
///
/// Every provider call holds a permit for its duration. Permits are released
/// when the returned guard drops, so a failed call cannot leak one.
#[derive(Clone)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Wait for a permit. The permit is returned to the pool when the guard
    /// goes out of scope.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, SearchError> {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SearchError::InternalError)
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_bounds_concurrency() {
        let limiter = RateLimiter::new(3);
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let limiter = limiter.clone();
            let current = current.clone();
            let peak = peak.clone();

            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await.unwrap();
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(limiter.available_permits(), 3);
    }

    #[tokio::test]
    async fn test_permit_released_on_error_path() {
        let limiter = RateLimiter::new(1);

        let failing_call = || async {
            let _permit = limiter.acquire().await?;
            Err::<(), _>(SearchError::ExternalApiError("upstream down".to_string()))
        };

        assert!(failing_call().await.is_err());

        // The permit came back despite the error
        assert_eq!(limiter.available_permits(), 1);
        assert!(limiter.acquire().await.is_ok());
    }

    #[test]
    fn test_reports_capacity() {
        let limiter = RateLimiter::new(10);
        assert_eq!(limiter.max_concurrent(), 10);

        let _permit = tokio_test::block_on(limiter.acquire()).unwrap();
        assert_eq!(limiter.available_permits(), 9);
    }
}
