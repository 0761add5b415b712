//! Cooperative cancellation for in-flight requests.

use tokio_util::sync::CancellationToken;

use crate::error::AppError;

/// Cancellation state checked before each suspension point of a request.
///
/// Clones observe the same state. A signal made with [`child`] is cancelled
/// together with its parent, so a server can cancel every in-flight request
/// from one root signal.
///
/// [`child`]: CancellationSignal::child
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
}

impl CancellationSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal cancelled whenever this one is. Cancelling the child leaves
    /// the parent untouched.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Returns `Err(AppError::Cancelled)` once cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cancelled` if `cancel` has been called on this
    /// signal, any clone of it, or any of its ancestors.
    pub fn check(&self) -> Result<(), AppError> {
        if self.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }
}
