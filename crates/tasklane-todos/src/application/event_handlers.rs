//! Notification handlers for todo item events.

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::event::DomainEvent;
use tasklane_mediator::NotificationHandler;
use tracing::info;

use crate::domain::events::{TodoItemEvent, TodoItemEventKind};

fn log_event(event: &TodoItemEvent) {
    info!(
        event_type = event.event_type(),
        event_id = %event.metadata().event_id,
        todo_item_id = event.kind.item().id,
        "Tasklane domain event"
    );
}

/// Logs newly created items.
pub struct TodoItemCreatedEventHandler;

#[async_trait]
impl NotificationHandler<TodoItemEvent> for TodoItemCreatedEventHandler {
    async fn handle(&self, event: &TodoItemEvent) -> Result<(), AppError> {
        if matches!(event.kind, TodoItemEventKind::Created(_)) {
            log_event(event);
        }
        Ok(())
    }
}

/// Logs completed items.
pub struct TodoItemCompletedEventHandler;

#[async_trait]
impl NotificationHandler<TodoItemEvent> for TodoItemCompletedEventHandler {
    async fn handle(&self, event: &TodoItemEvent) -> Result<(), AppError> {
        if matches!(event.kind, TodoItemEventKind::Completed(_)) {
            log_event(event);
        }
        Ok(())
    }
}
