//! Application layer for the Todo items context.

pub mod command_handlers;
pub mod event_handlers;
pub mod query_handlers;
pub mod validators;

use tasklane_mediator::{MediatorBuilder, NotificationBus};
use tasklane_persistence::TodoContextFactory;

use crate::domain::aggregates::TodoItem;
use crate::domain::commands::{
    CreateTodoItemCommand, DeleteTodoItemCommand, GetTodoItemsWithPaginationQuery,
    PurgeTodoItemsCommand, UpdateTodoItemCommand, UpdateTodoItemDetailCommand,
};
use crate::domain::events::TodoItemEvent;

/// Registers every todo item command, query and validator.
#[must_use]
pub fn register(builder: MediatorBuilder, contexts: &TodoContextFactory<TodoItem>) -> MediatorBuilder {
    builder
        .validator::<CreateTodoItemCommand, _>(validators::CreateTodoItemCommandValidator)
        .validator::<UpdateTodoItemCommand, _>(validators::UpdateTodoItemCommandValidator)
        .validator::<UpdateTodoItemDetailCommand, _>(validators::UpdateTodoItemDetailCommandValidator)
        .validator::<GetTodoItemsWithPaginationQuery, _>(
            validators::GetTodoItemsWithPaginationQueryValidator,
        )
        .register::<CreateTodoItemCommand, _>(command_handlers::CreateTodoItemHandler::new(
            contexts.clone(),
        ))
        .register::<UpdateTodoItemCommand, _>(command_handlers::UpdateTodoItemHandler::new(
            contexts.clone(),
        ))
        .register::<UpdateTodoItemDetailCommand, _>(
            command_handlers::UpdateTodoItemDetailHandler::new(contexts.clone()),
        )
        .register::<DeleteTodoItemCommand, _>(command_handlers::DeleteTodoItemHandler::new(
            contexts.clone(),
        ))
        .register::<PurgeTodoItemsCommand, _>(command_handlers::PurgeTodoItemsHandler::new(
            contexts.clone(),
        ))
        .register::<GetTodoItemsWithPaginationQuery, _>(
            query_handlers::GetTodoItemsWithPaginationHandler::new(contexts.clone()),
        )
}

/// The notification bus with this context's event subscribers attached.
#[must_use]
pub fn notification_bus() -> NotificationBus<TodoItemEvent> {
    NotificationBus::new()
        .with_handler(event_handlers::TodoItemCreatedEventHandler)
        .with_handler(event_handlers::TodoItemCompletedEventHandler)
}
