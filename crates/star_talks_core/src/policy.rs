//! crates/star_talks_core/src/policy.rs
//!
//! Failure policy applied around every upstream call. The caller decides how
//! patient the core should be; the core itself never hardcodes a retry.

use futures::future::BoxFuture;
use std::time::Duration;
use tracing::warn;

use crate::ports::{PortError, PortResult};

/// A single follow-up attempt after a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// How long to wait before the second attempt.
    pub backoff: Duration,
}

/// Timeout and retry settings for one upstream call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Option<Duration>,
    pub retry: Option<RetryPolicy>,
}

impl CallPolicy {
    /// One attempt, no timeout beyond the transport's own.
    pub fn one_shot() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry(mut self, backoff: Duration) -> Self {
        self.retry = Some(RetryPolicy { backoff });
        self
    }

    /// Runs `call` under this policy.
    ///
    /// At most two attempts are made, and only when a retry is configured.
    pub async fn execute<'a, T, F>(&self, call: F) -> PortResult<T>
    where
        F: Fn() -> BoxFuture<'a, PortResult<T>>,
    {
        match self.attempt(&call).await {
            Ok(value) => Ok(value),
            Err(first) => match self.retry {
                Some(retry) => {
                    warn!(
                        "Upstream call failed ({}); retrying once after {:?}",
                        first, retry.backoff
                    );
                    tokio::time::sleep(retry.backoff).await;
                    self.attempt(&call).await
                }
                None => Err(first),
            },
        }
    }

    async fn attempt<'a, T, F>(&self, call: &F) -> PortResult<T>
    where
        F: Fn() -> BoxFuture<'a, PortResult<T>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call())
                .await
                .map_err(|_| PortError::Timeout(limit))?,
            None => call().await,
        }
    }
}
