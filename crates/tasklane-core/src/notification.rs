//! Notification publishing contract.

use async_trait::async_trait;

use crate::error::AppError;

/// Hands a domain event to every interested subscriber.
#[async_trait]
pub trait NotificationPublisher<E>: Send + Sync
where
    E: Send + Sync,
{
    /// Publishes `event`, completing once every subscriber has handled it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Publish` if any subscriber fails.
    async fn publish(&self, event: &E) -> Result<(), AppError>;
}
