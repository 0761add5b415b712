//! Aggregate roots for the Todo items context.

use chrono::{DateTime, Utc};
use tasklane_core::aggregate::AggregateRoot;
use tasklane_core::audit::{AuditInfo, Auditable};
use tasklane_core::clock::Clock;
use tasklane_core::event::EventMetadata;
use tasklane_persistence::{TodoRecord, TrackedEntity};
use tracing::warn;
use uuid::Uuid;

use super::events::{TodoItemEvent, TodoItemEventKind, TodoItemSnapshot};
use super::priority::PriorityLevel;

/// The aggregate root for a single todo item.
#[derive(Debug, Clone)]
pub struct TodoItem {
    id: i64,
    title: Option<String>,
    note: Option<String>,
    priority: PriorityLevel,
    reminder: Option<DateTime<Utc>>,
    done: bool,
    audit: AuditInfo,
    /// Events raised since the last save.
    domain_events: Vec<TodoItemEvent>,
}

impl TodoItem {
    /// Creates a new, not-done item, producing a `Created` event.
    #[must_use]
    pub fn create(title: Option<String>, clock: &dyn Clock) -> Self {
        let mut item = Self {
            id: 0,
            title,
            note: None,
            priority: PriorityLevel::None,
            reminder: None,
            done: false,
            audit: AuditInfo::default(),
            domain_events: Vec::new(),
        };
        item.raise(TodoItemEventKind::Created, clock);
        item
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    #[must_use]
    pub fn priority(&self) -> PriorityLevel {
        self.priority
    }

    #[must_use]
    pub fn reminder(&self) -> Option<DateTime<Utc>> {
        self.reminder
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn rename(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Sets the done flag. Only a `false -> true` transition produces a
    /// `Completed` event.
    pub fn set_done(&mut self, done: bool, clock: &dyn Clock) {
        let completing = done && !self.done;
        self.done = done;
        if completing {
            self.raise(TodoItemEventKind::Completed, clock);
        }
    }

    pub fn update_detail(
        &mut self,
        priority: PriorityLevel,
        note: Option<String>,
        reminder: Option<DateTime<Utc>>,
    ) {
        self.priority = priority;
        self.note = note;
        self.reminder = reminder;
    }

    /// Records that the item is being deleted, producing a `Deleted` event.
    pub fn mark_deleted(&mut self, clock: &dyn Clock) {
        self.raise(TodoItemEventKind::Deleted, clock);
    }

    /// Removes the first pending event with `event_id`. Returns `false` when
    /// there is none.
    pub fn remove_domain_event(&mut self, event_id: Uuid) -> bool {
        match self
            .domain_events
            .iter()
            .position(|event| event.metadata.event_id == event_id)
        {
            Some(index) => {
                self.domain_events.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> TodoItemSnapshot {
        TodoItemSnapshot {
            id: self.id,
            title: self.title.clone(),
            done: self.done,
            priority: self.priority,
            note: self.note.clone(),
            reminder: self.reminder,
        }
    }

    fn raise(&mut self, kind: fn(TodoItemSnapshot) -> TodoItemEventKind, clock: &dyn Clock) {
        let kind = kind(self.snapshot());
        self.domain_events.push(TodoItemEvent {
            metadata: EventMetadata::new(kind.event_type(), clock),
            kind,
        });
    }
}

impl AggregateRoot for TodoItem {
    type Event = TodoItemEvent;

    fn domain_events(&self) -> &[Self::Event] {
        &self.domain_events
    }

    fn clear_domain_events(&mut self) {
        self.domain_events.clear();
    }
}

impl Auditable for TodoItem {
    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }
}

impl TrackedEntity for TodoItem {
    const NAME: &'static str = "TodoItem";

    fn id(&self) -> i64 {
        self.id
    }

    /// Pending events raised before the first save carry id 0; they pick up
    /// the assigned id here.
    fn assign_id(&mut self, id: i64) {
        self.id = id;
        for event in &mut self.domain_events {
            let item = event.kind.item_mut();
            if item.id == 0 {
                item.id = id;
            }
        }
    }

    fn to_record(&self) -> TodoRecord {
        TodoRecord {
            id: self.id,
            title: self.title.clone(),
            note: self.note.clone(),
            priority: self.priority.value(),
            reminder: self.reminder,
            done: self.done,
            created: self.audit.created,
            created_by: self.audit.created_by.clone(),
            last_modified: self.audit.last_modified,
            last_modified_by: self.audit.last_modified_by.clone(),
        }
    }

    fn from_record(record: TodoRecord) -> Self {
        let priority = PriorityLevel::try_from(record.priority).unwrap_or_else(|err| {
            warn!(id = record.id, error = %err, "stored priority out of range, using None");
            PriorityLevel::None
        });
        Self {
            id: record.id,
            title: record.title,
            note: record.note,
            priority,
            reminder: record.reminder,
            done: record.done,
            audit: AuditInfo {
                created: record.created,
                created_by: record.created_by,
                last_modified: record.last_modified,
                last_modified_by: record.last_modified_by,
            },
            domain_events: Vec::new(),
        }
    }
}
