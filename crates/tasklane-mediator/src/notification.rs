//! In-process fan-out of domain events to subscribers.

use std::sync::Arc;

use async_trait::async_trait;
use tasklane_core::error::AppError;
pub use tasklane_core::notification::NotificationPublisher;
use tracing::debug;

/// A subscriber to events of type `E`.
#[async_trait]
pub trait NotificationHandler<E>: Send + Sync {
    /// Reacts to `event`.
    async fn handle(&self, event: &E) -> Result<(), AppError>;
}

/// Publishes each event to every subscribed handler, one after another, in
/// subscription order. The first failing handler stops the fan-out and is
/// reported as `AppError::Publish`.
pub struct NotificationBus<E> {
    handlers: Vec<Arc<dyn NotificationHandler<E>>>,
}

impl<E> Default for NotificationBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E: Send + Sync> NotificationBus<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler`.
    #[must_use]
    pub fn with_handler(mut self, handler: impl NotificationHandler<E> + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl<E> NotificationPublisher<E> for NotificationBus<E>
where
    E: std::fmt::Debug + Send + Sync,
{
    async fn publish(&self, event: &E) -> Result<(), AppError> {
        debug!(?event, handlers = self.handlers.len(), "publishing notification");
        for handler in &self.handlers {
            handler.handle(event).await.map_err(|err| match err {
                AppError::Publish(_) => err,
                other => AppError::Publish(other.to_string()),
            })?;
        }
        Ok(())
    }
}
