//! Per-request unit of work over the `todo_items` collection.

use std::sync::Arc;

use tasklane_core::cancellation::CancellationSignal;
use tasklane_core::clock::Clock;
use tasklane_core::error::AppError;
use tasklane_core::notification::NotificationPublisher;
use tracing::debug;

use crate::interceptors::{
    AuditableEntityInterceptor, DispatchDomainEventsInterceptor, SaveChangesInterceptor,
};
use crate::record::CommitOutcome;
use crate::store::TodoStore;
use crate::tracker::{ChangeTracker, EntityEntry, EntryId, TrackedEntity};

/// Tracks the entities one request adds, loads and removes, and writes them
/// back in a single commit.
///
/// `save_changes` runs in four steps, aborting at the first failure:
/// `saving_changes` on every interceptor in registration order, the store
/// commit, settling the tracker, then `saved_changes` on every interceptor.
pub struct TodoContext<T: TrackedEntity> {
    store: Arc<dyn TodoStore>,
    tracker: ChangeTracker<T>,
    interceptors: Vec<Arc<dyn SaveChangesInterceptor<T>>>,
    cancellation: CancellationSignal,
}

impl<T: TrackedEntity> TodoContext<T> {
    /// A context with no interceptors.
    pub fn new(store: Arc<dyn TodoStore>, cancellation: CancellationSignal) -> Self {
        Self {
            store,
            tracker: ChangeTracker::new(),
            interceptors: Vec::new(),
            cancellation,
        }
    }

    /// Appends an interceptor; interceptors run in the order they were added.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: impl SaveChangesInterceptor<T> + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Tracks a new entity; it is inserted on the next save.
    pub fn add(&mut self, entity: T) -> EntryId {
        self.tracker.add(entity)
    }

    /// The tracked entity behind `key`.
    #[must_use]
    pub fn entity(&self, key: EntryId) -> Option<&T> {
        self.tracker.get(key).map(EntityEntry::entity)
    }

    /// Returns the tracked entity with `id`, loading it from the store on
    /// first access.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataLayer` when the store lookup fails.
    pub async fn find(&mut self, id: i64) -> Result<Option<&mut T>, AppError> {
        let key = match self.tracker.find(id) {
            Some(key) => key,
            None => {
                let Some(record) = self.store.find(id).await? else {
                    return Ok(None);
                };
                self.tracker.attach(T::from_record(record))
            }
        };
        Ok(self.tracker.get_mut(key).map(EntityEntry::entity_mut))
    }

    /// Marks the tracked entity with `id` for deletion. Returns `false` when
    /// no such entity is tracked; call `find` first.
    pub fn remove(&mut self, id: i64) -> bool {
        self.tracker
            .find(id)
            .is_some_and(|key| self.tracker.remove(key))
    }

    /// Marks the entity behind `key` for deletion. An entity that was added
    /// and never saved is dropped along with its pending events.
    pub fn remove_entry(&mut self, key: EntryId) -> bool {
        self.tracker.remove(key)
    }

    /// Reads one page of entities ordered by title without tracking them.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataLayer` when the store read fails.
    pub async fn list_page(&self, offset: u64, limit: u32) -> Result<(Vec<T>, u64), AppError> {
        let (records, total) = self.store.page(offset, limit).await?;
        Ok((records.into_iter().map(T::from_record).collect(), total))
    }

    #[must_use]
    pub fn tracker(&self) -> &ChangeTracker<T> {
        &self.tracker
    }

    /// Persists every tracked change and returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns the first interceptor or store failure, or
    /// `AppError::Cancelled` when the request was cancelled before the
    /// commit. A failure in `saved_changes` is returned even though the
    /// commit itself already succeeded.
    pub async fn save_changes(&mut self) -> Result<u64, AppError> {
        self.tracker.detect_changes();

        for interceptor in &self.interceptors {
            interceptor.saving_changes(Some(&mut self.tracker)).await?;
        }

        self.cancellation.check()?;
        let writes = self.tracker.pending_writes();
        let outcome = if writes.is_empty() {
            CommitOutcome::default()
        } else {
            self.store.commit(writes).await?
        };
        self.tracker.accept_changes(&outcome.inserted_ids);
        debug!(
            entity = T::NAME,
            rows_affected = outcome.rows_affected,
            "changes saved"
        );

        for interceptor in &self.interceptors {
            interceptor.saved_changes(Some(&mut self.tracker)).await?;
        }

        Ok(outcome.rows_affected)
    }
}

/// Builds request-scoped contexts with the standard interceptors: audit
/// stamping for the calling user, then domain event dispatch.
pub struct TodoContextFactory<T: TrackedEntity> {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn NotificationPublisher<T::Event>>,
}

impl<T: TrackedEntity> Clone for TodoContextFactory<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<T: TrackedEntity> TodoContextFactory<T> {
    pub fn new(
        store: Arc<dyn TodoStore>,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn NotificationPublisher<T::Event>>,
    ) -> Self {
        Self {
            store,
            clock,
            publisher,
        }
    }

    /// The clock audit stamps are taken from.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// A fresh context acting for `user_id`.
    #[must_use]
    pub fn create(&self, user_id: Option<&str>, cancellation: &CancellationSignal) -> TodoContext<T> {
        TodoContext::new(Arc::clone(&self.store), cancellation.clone())
            .with_interceptor(AuditableEntityInterceptor::new(
                user_id.map(str::to_owned),
                Arc::clone(&self.clock),
            ))
            .with_interceptor(DispatchDomainEventsInterceptor::new(
                Arc::clone(&self.publisher),
                cancellation.clone(),
            ))
    }
}
