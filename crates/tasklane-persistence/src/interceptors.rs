//! Hooks that run around the store commit in `TodoContext::save_changes`.

use std::sync::Arc;

use async_trait::async_trait;
use tasklane_core::aggregate::AggregateRoot;
use tasklane_core::cancellation::CancellationSignal;
use tasklane_core::clock::Clock;
use tasklane_core::error::AppError;
use tasklane_core::event::DomainEvent;
use tasklane_core::notification::NotificationPublisher;
use tracing::debug;

use crate::tracker::{ChangeTracker, EntityState, TrackedEntity};

/// Called before and after every save. A `None` tracker means there is no
/// unit of work to inspect; implementations treat it as a no-op.
#[async_trait]
pub trait SaveChangesInterceptor<T: TrackedEntity>: Send + Sync {
    /// Runs after change detection, before anything is written.
    async fn saving_changes(&self, _tracker: Option<&mut ChangeTracker<T>>) -> Result<(), AppError> {
        Ok(())
    }

    /// Runs after the commit succeeded and the tracker was settled.
    async fn saved_changes(&self, _tracker: Option<&mut ChangeTracker<T>>) -> Result<(), AppError> {
        Ok(())
    }
}

/// Stamps audit fields on added and modified entities before they are
/// written.
pub struct AuditableEntityInterceptor {
    user_id: Option<String>,
    clock: Arc<dyn Clock>,
}

impl AuditableEntityInterceptor {
    pub fn new(user_id: Option<String>, clock: Arc<dyn Clock>) -> Self {
        Self { user_id, clock }
    }
}

#[async_trait]
impl<T: TrackedEntity> SaveChangesInterceptor<T> for AuditableEntityInterceptor {
    async fn saving_changes(&self, tracker: Option<&mut ChangeTracker<T>>) -> Result<(), AppError> {
        let Some(tracker) = tracker else {
            return Ok(());
        };
        let now = self.clock.now();
        let user_id = self.user_id.as_deref();
        for entry in tracker.entries_mut() {
            match entry.state() {
                EntityState::Added => entry.entity_mut().audit_mut().stamp_created(now, user_id),
                EntityState::Modified => entry.entity_mut().audit_mut().stamp_modified(now, user_id),
                EntityState::Unchanged | EntityState::Deleted | EntityState::Detached => {}
            }
        }
        Ok(())
    }
}

/// Publishes the domain events buffered on tracked entities once the commit
/// has succeeded.
///
/// Events are collected in tracker order and every buffer is cleared before
/// the first publish, so a failing subscriber never causes a re-publish on a
/// later save. Publishing is sequential; the first failure is returned.
pub struct DispatchDomainEventsInterceptor<E> {
    publisher: Arc<dyn NotificationPublisher<E>>,
    cancellation: CancellationSignal,
}

impl<E: Send + Sync> DispatchDomainEventsInterceptor<E> {
    pub fn new(publisher: Arc<dyn NotificationPublisher<E>>, cancellation: CancellationSignal) -> Self {
        Self {
            publisher,
            cancellation,
        }
    }
}

#[async_trait]
impl<T> SaveChangesInterceptor<T> for DispatchDomainEventsInterceptor<T::Event>
where
    T: TrackedEntity,
    T::Event: Send + Sync,
{
    async fn saved_changes(&self, tracker: Option<&mut ChangeTracker<T>>) -> Result<(), AppError> {
        let Some(tracker) = tracker else {
            return Ok(());
        };

        let mut events = Vec::new();
        for entry in tracker.entries_mut() {
            let entity = entry.entity_mut();
            if entity.domain_events().is_empty() {
                continue;
            }
            events.extend(entity.domain_events().iter().cloned());
            entity.clear_domain_events();
        }

        for event in &events {
            self.cancellation.check()?;
            debug!(
                event_type = event.event_type(),
                event_id = %event.metadata().event_id,
                "dispatching domain event"
            );
            self.publisher.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tasklane_test_support::{FailingPublisher, FixedClock, RecordingPublisher, fixed_now};

    use super::*;
    use crate::testing::{Memo, MemoEvent};

    fn audit_interceptor(user_id: Option<&str>) -> AuditableEntityInterceptor {
        AuditableEntityInterceptor::new(user_id.map(str::to_owned), Arc::new(FixedClock::default()))
    }

    fn dispatcher(
        publisher: Arc<dyn NotificationPublisher<MemoEvent>>,
    ) -> DispatchDomainEventsInterceptor<MemoEvent> {
        DispatchDomainEventsInterceptor::new(publisher, CancellationSignal::new())
    }

    // --- audit ---

    #[tokio::test]
    async fn test_added_entity_gets_created_and_modified_stamps() {
        // Arrange
        let mut tracker = ChangeTracker::new();
        let key = tracker.add(Memo::new("Test"));

        // Act
        audit_interceptor(Some("test-user-id"))
            .saving_changes(Some(&mut tracker))
            .await
            .unwrap();

        // Assert
        let audit = &tracker.get(key).unwrap().entity().audit;
        assert_eq!(audit.created, Some(fixed_now()));
        assert_eq!(audit.created_by.as_deref(), Some("test-user-id"));
        assert_eq!(audit.last_modified, Some(fixed_now()));
        assert_eq!(audit.last_modified_by.as_deref(), Some("test-user-id"));
    }

    #[tokio::test]
    async fn test_modified_entity_only_gets_modified_stamps() {
        // Arrange
        let original = fixed_now() - Duration::days(1);
        let mut memo = Memo::stored(5, "Test");
        memo.audit.stamp_created(original, Some("original-user"));
        let mut tracker = ChangeTracker::new();
        let key = tracker.attach(memo);
        tracker.get_mut(key).unwrap().entity_mut().text = "Updated".into();
        tracker.detect_changes();

        // Act
        audit_interceptor(Some("test-user-id"))
            .saving_changes(Some(&mut tracker))
            .await
            .unwrap();

        // Assert
        let audit = &tracker.get(key).unwrap().entity().audit;
        assert_eq!(audit.created, Some(original));
        assert_eq!(audit.created_by.as_deref(), Some("original-user"));
        assert_eq!(audit.last_modified, Some(fixed_now()));
        assert_eq!(audit.last_modified_by.as_deref(), Some("test-user-id"));
    }

    #[tokio::test]
    async fn test_unchanged_entity_is_not_stamped() {
        let mut tracker = ChangeTracker::new();
        let key = tracker.attach(Memo::stored(5, "Test"));

        audit_interceptor(Some("test-user-id"))
            .saving_changes(Some(&mut tracker))
            .await
            .unwrap();

        assert_eq!(tracker.get(key).unwrap().entity().audit.last_modified, None);
    }

    #[tokio::test]
    async fn test_anonymous_save_stamps_time_without_user() {
        let mut tracker = ChangeTracker::new();
        let key = tracker.add(Memo::new("Test"));

        audit_interceptor(None)
            .saving_changes(Some(&mut tracker))
            .await
            .unwrap();

        let audit = &tracker.get(key).unwrap().entity().audit;
        assert_eq!(audit.created, Some(fixed_now()));
        assert_eq!(audit.created_by, None);
    }

    #[tokio::test]
    async fn test_audit_without_tracker_is_a_no_op() {
        let result = SaveChangesInterceptor::<Memo>::saving_changes(&audit_interceptor(None), None).await;

        assert!(result.is_ok());
    }

    // --- dispatch ---

    #[tokio::test]
    async fn test_entity_events_are_published_and_cleared() {
        // Arrange
        let publisher = Arc::new(RecordingPublisher::<MemoEvent>::new());
        let mut memo = Memo::new("Test");
        memo.raise("created");
        let mut tracker = ChangeTracker::new();
        let key = tracker.add(memo);

        // Act
        dispatcher(publisher.clone())
            .saved_changes(Some(&mut tracker))
            .await
            .unwrap();

        // Assert
        assert_eq!(publisher.published().len(), 1);
        assert!(tracker.get(key).unwrap().entity().domain_events().is_empty());
    }

    #[tokio::test]
    async fn test_events_of_multiple_entities_are_published_in_tracker_order() {
        // Arrange
        let publisher = Arc::new(RecordingPublisher::<MemoEvent>::new());
        let mut first = Memo::new("Test1");
        first.raise("first-created");
        first.raise("first-deleted");
        let mut second = Memo::new("Test2");
        second.raise("second-created");
        let mut tracker = ChangeTracker::new();
        tracker.add(first);
        tracker.add(Memo::new("quiet"));
        tracker.add(second);

        // Act
        dispatcher(publisher.clone())
            .saved_changes(Some(&mut tracker))
            .await
            .unwrap();

        // Assert
        let texts: Vec<_> = publisher.published().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["first-created", "first-deleted", "second-created"]);
        assert!(
            tracker
                .entries()
                .iter()
                .all(|entry| entry.entity().domain_events().is_empty())
        );
    }

    #[tokio::test]
    async fn test_no_events_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::<MemoEvent>::new());
        let mut tracker = ChangeTracker::new();
        tracker.add(Memo::new("Test"));

        dispatcher(publisher.clone())
            .saved_changes(Some(&mut tracker))
            .await
            .unwrap();

        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_without_tracker_is_a_no_op() {
        let publisher = Arc::new(RecordingPublisher::<MemoEvent>::new());

        let result =
            SaveChangesInterceptor::<Memo>::saved_changes(&dispatcher(publisher.clone()), None).await;

        assert!(result.is_ok());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_first_publish_failure_stops_dispatch_and_buffers_stay_cleared() {
        // Arrange
        let publisher = Arc::new(FailingPublisher::new());
        let mut memo = Memo::new("Test");
        memo.raise("one");
        memo.raise("two");
        let mut tracker = ChangeTracker::new();
        let key = tracker.add(memo);

        // Act
        let result = dispatcher(publisher.clone())
            .saved_changes(Some(&mut tracker))
            .await;

        // Assert
        assert!(matches!(result, Err(AppError::Publish(_))));
        assert_eq!(publisher.attempts(), 1);
        assert!(tracker.get(key).unwrap().entity().domain_events().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_dispatch_publishes_nothing() {
        // Arrange
        let publisher = Arc::new(RecordingPublisher::<MemoEvent>::new());
        let cancellation = CancellationSignal::new();
        cancellation.cancel();
        let interceptor = DispatchDomainEventsInterceptor::new(
            publisher.clone() as Arc<dyn NotificationPublisher<MemoEvent>>,
            cancellation,
        );
        let mut memo = Memo::new("Test");
        memo.raise("created");
        let mut tracker = ChangeTracker::new();
        tracker.add(memo);

        // Act
        let result = interceptor.saved_changes(Some(&mut tracker)).await;

        // Assert
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(publisher.published().is_empty());
    }
}
