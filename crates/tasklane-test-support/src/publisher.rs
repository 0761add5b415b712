//! Test publishers — mock `NotificationPublisher` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::notification::NotificationPublisher;

/// A publisher that records every event it is handed and always succeeds.
#[derive(Debug)]
pub struct RecordingPublisher<E> {
    published: Mutex<Vec<E>>,
}

impl<E> Default for RecordingPublisher<E> {
    fn default() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> RecordingPublisher<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all published events, in publish order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<E> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl<E> NotificationPublisher<E> for RecordingPublisher<E>
where
    E: Clone + Send + Sync,
{
    async fn publish(&self, event: &E) -> Result<(), AppError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A publisher whose every publish fails. Counts the attempts so tests can
/// check that dispatch stopped at the first failure.
#[derive(Debug, Default)]
pub struct FailingPublisher {
    attempts: Mutex<usize>,
}

impl FailingPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publish attempts so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl<E> NotificationPublisher<E> for FailingPublisher
where
    E: Send + Sync,
{
    async fn publish(&self, _event: &E) -> Result<(), AppError> {
        *self.attempts.lock().unwrap() += 1;
        Err(AppError::Publish("subscriber failed".into()))
    }
}
