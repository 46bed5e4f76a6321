//! Per-call deadline passed to every revocation store operation

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::StoreError;

/// Carries the caller's deadline into store round trips
///
/// A slow or unreachable store then fails the request it belongs to with
/// [`StoreError::DeadlineExceeded`] instead of hanging it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context without deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Drive `operation` to completion or until the deadline passes
    pub async fn run<F, T>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match self.deadline {
            None => operation.await,
            Some(deadline) => tokio::time::timeout_at(deadline, operation)
                .await
                .unwrap_or(Err(StoreError::DeadlineExceeded)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out_slow_operation() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(true)
            })
            .await;

        assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
        assert!(ctx.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_passes_through_fast_operation() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(1));

        let result = ctx.run(async { Ok::<_, StoreError>(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert!(!ctx.is_expired());
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_background_has_no_deadline() {
        let ctx = RequestContext::background();

        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_expired());
        assert!(matches!(
            ctx.run(async { Err::<(), _>(StoreError::Closed) }).await,
            Err(StoreError::Closed)
        ));
    }
}
