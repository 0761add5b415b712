//! Commands and queries for the Todo items context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tasklane_core::pagination::PaginatedList;
use tasklane_mediator::{Authorize, Request};

use super::aggregates::TodoItem;
use super::priority::PriorityLevel;

/// Command to create a todo item. Responds with the new item's id.
#[derive(Debug, Clone, Default)]
pub struct CreateTodoItemCommand {
    pub title: Option<String>,
}

impl Request for CreateTodoItemCommand {
    type Response = i64;

    fn request_type(&self) -> &'static str {
        "CreateTodoItemCommand"
    }
}

/// Command to rename an item and set its done flag.
#[derive(Debug, Clone)]
pub struct UpdateTodoItemCommand {
    pub id: i64,
    pub title: Option<String>,
    pub done: bool,
}

impl Request for UpdateTodoItemCommand {
    type Response = ();

    fn request_type(&self) -> &'static str {
        "UpdateTodoItemCommand"
    }
}

/// Command to replace an item's priority, note and reminder.
#[derive(Debug, Clone)]
pub struct UpdateTodoItemDetailCommand {
    pub id: i64,
    pub priority: PriorityLevel,
    pub note: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

impl Request for UpdateTodoItemDetailCommand {
    type Response = ();

    fn request_type(&self) -> &'static str {
        "UpdateTodoItemDetailCommand"
    }
}

/// Command to delete one item.
#[derive(Debug, Clone, Copy)]
pub struct DeleteTodoItemCommand {
    pub id: i64,
}

impl Request for DeleteTodoItemCommand {
    type Response = ();

    fn request_type(&self) -> &'static str {
        "DeleteTodoItemCommand"
    }
}

/// Command to delete every item. Responds with the number deleted.
/// Restricted to administrators who also pass the `CanPurge` policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeTodoItemsCommand;

impl Request for PurgeTodoItemsCommand {
    type Response = u64;
    const AUTHORIZE: &'static [Authorize] =
        &[Authorize::roles_and_policy("Administrator", "CanPurge")];

    fn request_type(&self) -> &'static str {
        "PurgeTodoItemsCommand"
    }
}

/// Query for one page of items ordered by title.
#[derive(Debug, Clone, Copy)]
pub struct GetTodoItemsWithPaginationQuery {
    pub page_number: i32,
    pub page_size: i32,
}

impl Default for GetTodoItemsWithPaginationQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
        }
    }
}

impl Request for GetTodoItemsWithPaginationQuery {
    type Response = PaginatedList<TodoItemBriefDto>;

    fn request_type(&self) -> &'static str {
        "GetTodoItemsWithPaginationQuery"
    }
}

/// Listing projection of a todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemBriefDto {
    pub id: i64,
    pub title: Option<String>,
    pub done: bool,
}

impl From<&TodoItem> for TodoItemBriefDto {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id(),
            title: item.title().map(str::to_owned),
            done: item.is_done(),
        }
    }
}
