//! Change tracking for the entities held by a unit of work.

use tasklane_core::aggregate::AggregateRoot;
use tasklane_core::audit::Auditable;

use crate::record::{PendingWrite, TodoRecord};

/// An aggregate the unit of work can load, snapshot and persist.
pub trait TrackedEntity: AggregateRoot + Auditable + 'static {
    /// Entity name used in `NotFound` errors.
    const NAME: &'static str;

    /// Store-assigned id; 0 until the first save.
    fn id(&self) -> i64;

    /// Called once the store has assigned an id to an inserted entity.
    fn assign_id(&mut self, id: i64);

    /// Current persistent state.
    fn to_record(&self) -> TodoRecord;

    /// Rebuilds an entity from a stored row, with an empty event buffer.
    fn from_record(record: TodoRecord) -> Self;
}

/// Where a tracked entity stands relative to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// New; inserted on the next save.
    Added,
    /// Matches its snapshot.
    Unchanged,
    /// Differs from its snapshot; updated on the next save.
    Modified,
    /// Removed; deleted on the next save.
    Deleted,
    /// Deleted by an earlier save, or removed before it was ever inserted.
    /// Kept only so pending `Deleted` events can still be dispatched.
    Detached,
}

/// Stable handle to a tracked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(usize);

#[derive(Debug)]
pub struct EntityEntry<T> {
    entity: T,
    state: EntityState,
    original: Option<TodoRecord>,
}

impl<T> EntityEntry<T> {
    #[must_use]
    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    #[must_use]
    pub fn state(&self) -> EntityState {
        self.state
    }

    fn is_live(&self) -> bool {
        matches!(
            self.state,
            EntityState::Added | EntityState::Unchanged | EntityState::Modified
        )
    }
}

/// Entries in the order they were added or loaded.
#[derive(Debug)]
pub struct ChangeTracker<T> {
    entries: Vec<EntityEntry<T>>,
}

impl<T> Default for ChangeTracker<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: TrackedEntity> ChangeTracker<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a new entity for insertion.
    pub fn add(&mut self, entity: T) -> EntryId {
        self.entries.push(EntityEntry {
            entity,
            state: EntityState::Added,
            original: None,
        });
        EntryId(self.entries.len() - 1)
    }

    /// Tracks an entity loaded from the store as unchanged.
    pub fn attach(&mut self, entity: T) -> EntryId {
        let original = Some(entity.to_record());
        self.entries.push(EntityEntry {
            entity,
            state: EntityState::Unchanged,
            original,
        });
        EntryId(self.entries.len() - 1)
    }

    /// Finds a live, persisted entity by id.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<EntryId> {
        self.entries
            .iter()
            .position(|entry| entry.is_live() && entry.entity.id() == id && id != 0)
            .map(EntryId)
    }

    #[must_use]
    pub fn get(&self, key: EntryId) -> Option<&EntityEntry<T>> {
        self.entries.get(key.0)
    }

    pub fn get_mut(&mut self, key: EntryId) -> Option<&mut EntityEntry<T>> {
        self.entries.get_mut(key.0)
    }

    /// Marks an entry for deletion. An entity added since the last save was
    /// never written: it is detached at once and its pending events are
    /// dropped. Returns `false` when the entry is not live.
    pub fn remove(&mut self, key: EntryId) -> bool {
        match self.entries.get_mut(key.0) {
            Some(entry) if entry.is_live() => {
                if entry.state == EntityState::Added {
                    entry.entity.clear_domain_events();
                    entry.state = EntityState::Detached;
                } else {
                    entry.state = EntityState::Deleted;
                }
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[EntityEntry<T>] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [EntityEntry<T>] {
        &mut self.entries
    }

    /// Flags unchanged entries whose state differs from their snapshot.
    pub fn detect_changes(&mut self) {
        for entry in &mut self.entries {
            if entry.state == EntityState::Unchanged
                && entry.original.as_ref() != Some(&entry.entity.to_record())
            {
                entry.state = EntityState::Modified;
            }
        }
    }

    /// Returns `true` when the next save would write anything.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|entry| {
            matches!(
                entry.state,
                EntityState::Added | EntityState::Modified | EntityState::Deleted
            )
        })
    }

    /// The writes the next save performs, in tracker order.
    #[must_use]
    pub fn pending_writes(&self) -> Vec<PendingWrite> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.state {
                EntityState::Added => Some(PendingWrite::Insert(entry.entity.to_record())),
                EntityState::Modified => Some(PendingWrite::Update(entry.entity.to_record())),
                EntityState::Deleted => Some(PendingWrite::Delete(entry.entity.id())),
                EntityState::Unchanged | EntityState::Detached => None,
            })
            .collect()
    }

    /// Settles the tracker after a commit: inserted entities receive their
    /// ids (in insertion order), written entries become unchanged with a
    /// fresh snapshot and deleted entries are detached.
    pub fn accept_changes(&mut self, inserted_ids: &[i64]) {
        let mut ids = inserted_ids.iter().copied();
        for entry in &mut self.entries {
            match entry.state {
                EntityState::Added => {
                    if let Some(id) = ids.next() {
                        entry.entity.assign_id(id);
                    }
                    entry.state = EntityState::Unchanged;
                    entry.original = Some(entry.entity.to_record());
                }
                EntityState::Modified => {
                    entry.state = EntityState::Unchanged;
                    entry.original = Some(entry.entity.to_record());
                }
                EntityState::Deleted => entry.state = EntityState::Detached,
                EntityState::Unchanged | EntityState::Detached => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Memo;

    #[test]
    fn test_loaded_entity_is_unchanged_until_mutated() {
        // Arrange
        let mut tracker = ChangeTracker::new();
        let key = tracker.attach(Memo::stored(7, "Buy milk"));

        // Act
        tracker.detect_changes();
        let before = tracker.get(key).unwrap().state();
        tracker.get_mut(key).unwrap().entity_mut().text = "Buy oat milk".into();
        tracker.detect_changes();

        // Assert
        assert_eq!(before, EntityState::Unchanged);
        assert_eq!(tracker.get(key).unwrap().state(), EntityState::Modified);
    }

    #[test]
    fn test_pending_writes_follow_tracker_order() {
        // Arrange
        let mut tracker = ChangeTracker::new();
        let loaded = tracker.attach(Memo::stored(3, "old"));
        tracker.add(Memo::new("fresh"));
        tracker.remove(loaded);

        // Act
        let writes = tracker.pending_writes();

        // Assert
        assert_eq!(writes.len(), 2);
        assert!(matches!(writes[0], PendingWrite::Delete(3)));
        assert!(matches!(&writes[1], PendingWrite::Insert(record) if record.title.as_deref() == Some("fresh")));
    }

    #[test]
    fn test_accept_changes_assigns_ids_and_detaches_deleted() {
        // Arrange
        let mut tracker = ChangeTracker::new();
        let deleted = tracker.attach(Memo::stored(3, "old"));
        let first = tracker.add(Memo::new("first"));
        let second = tracker.add(Memo::new("second"));
        tracker.remove(deleted);

        // Act
        tracker.accept_changes(&[10, 11]);

        // Assert
        assert_eq!(tracker.get(first).unwrap().entity().id, 10);
        assert_eq!(tracker.get(second).unwrap().entity().id, 11);
        assert_eq!(tracker.get(first).unwrap().state(), EntityState::Unchanged);
        assert_eq!(tracker.get(deleted).unwrap().state(), EntityState::Detached);
        assert_eq!(tracker.find(3), None);
        assert_eq!(tracker.find(11), Some(second));
        assert!(!tracker.has_changes());
    }

    #[test]
    fn test_removing_an_unsaved_entity_writes_nothing() {
        // Arrange
        let mut tracker = ChangeTracker::new();
        let mut memo = Memo::new("scratch");
        memo.raise("created");
        let key = tracker.add(memo);

        // Act
        let removed = tracker.remove(key);

        // Assert
        assert!(removed);
        assert!(tracker.pending_writes().is_empty());
        assert!(tracker.get(key).unwrap().entity().domain_events().is_empty());
        assert!(!tracker.remove(key));
    }

    #[test]
    fn test_removing_a_stored_entity_keeps_its_events() {
        let mut tracker = ChangeTracker::new();
        let mut memo = Memo::stored(5, "old");
        memo.raise("deleted");
        let key = tracker.attach(memo);

        assert!(tracker.remove(key));

        assert_eq!(tracker.get(key).unwrap().state(), EntityState::Deleted);
        assert_eq!(tracker.get(key).unwrap().entity().domain_events().len(), 1);
    }
}
