//! Domain events for the Todo items context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklane_core::event::{DomainEvent, EventMetadata};

use super::priority::PriorityLevel;

/// The state of a todo item at the moment an event was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItemSnapshot {
    /// The item id; 0 only while the item has never been saved.
    pub id: i64,
    pub title: Option<String>,
    pub done: bool,
    pub priority: PriorityLevel,
    pub note: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

/// Event payload variants for the Todo items context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoItemEventKind {
    /// A todo item was created.
    Created(TodoItemSnapshot),
    /// A todo item went from not done to done.
    Completed(TodoItemSnapshot),
    /// A todo item was deleted.
    Deleted(TodoItemSnapshot),
}

impl TodoItemEventKind {
    /// The item the event concerns.
    #[must_use]
    pub fn item(&self) -> &TodoItemSnapshot {
        match self {
            Self::Created(item) | Self::Completed(item) | Self::Deleted(item) => item,
        }
    }

    pub(crate) fn item_mut(&mut self) -> &mut TodoItemSnapshot {
        match self {
            Self::Created(item) | Self::Completed(item) | Self::Deleted(item) => item,
        }
    }

    pub(crate) fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "todo_items.created",
            Self::Completed(_) => "todo_items.completed",
            Self::Deleted(_) => "todo_items.deleted",
        }
    }
}

/// Domain event envelope for the Todo items context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TodoItemEventKind,
}

impl DomainEvent for TodoItemEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
