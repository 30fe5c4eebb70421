//! Operation Context Module
//!
//! A per-call cancellation signal: a `CancellationToken` plus an optional
//! absolute deadline. Store operations check it once, at entry.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

// == Context ==
/// Cancellation token and optional deadline passed into every store call.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context whose deadline is `now + timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// A context cancelled whenever `parent` is cancelled.
    ///
    /// Cancelling the returned context does not cancel `parent`.
    pub fn with_token(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            deadline: None,
        }
    }

    /// Sets (or tightens) the deadline to `now + timeout`.
    ///
    /// A timeout too large for `Instant` leaves the deadline unchanged.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self;
        };
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The absolute deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the context is cancelled or its deadline has passed.
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    /// Returns the reason this context is done, if it is.
    pub fn check(&self) -> StoreResult<()> {
        if self.token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StoreError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
