//! Per-call resolution context

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::cancellation::CancellationToken;
use crate::errors::{SreqError, SreqResult};

/// Per-call data passed alongside every provider call
///
/// Carries the target environment, an optional deadline and a cancellation
/// token. Providers never store a context; it only lives for the duration of
/// one `get`/`get_multiple`/`health` call.
///
/// The deadline is absolute: it is fixed when the timeout is set, and every
/// backend call made with the context (or a clone of it) shares it.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sreq_core::ResolveContext;
///
/// let ctx = ResolveContext::for_env("staging").with_timeout(Duration::from_secs(5));
/// assert_eq!(ctx.environment(), "staging");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    env: Option<String>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl ResolveContext {
    /// Context with no environment, no timeout and a fresh token
    pub fn new() -> Self {
        Self::default()
    }

    /// Context targeting a specific environment
    pub fn for_env(env: impl Into<String>) -> Self {
        Self {
            env: Some(env.into()),
            ..Self::default()
        }
    }

    /// Set the target environment
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Give the whole call `timeout`, measured from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Finish every backend call made with this context by `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.timeout = Some(deadline.saturating_duration_since(Instant::now()));
        self.deadline = Some(deadline);
        self
    }

    /// Use a caller-owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Target environment; an absent environment is the empty string
    pub fn environment(&self) -> &str {
        self.env.as_deref().unwrap_or("")
    }

    /// Budget the deadline was set with
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a backend call under this context's deadline and cancellation
    ///
    /// Cancellation wins over completion when both are ready. Either one
    /// drops the in-flight future and yields a network-category error.
    pub async fn run<F, T>(&self, operation: &str, call: F) -> SreqResult<T>
    where
        F: Future<Output = SreqResult<T>>,
    {
        if self.is_cancelled() {
            return Err(SreqError::cancelled(operation));
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
                    Ok(result) => result,
                    Err(_) => Err(SreqError::deadline_exceeded(
                        operation,
                        self.timeout.unwrap_or_default(),
                    )),
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SreqError::cancelled(operation)),
            result = bounded => result,
        }
    }
}
