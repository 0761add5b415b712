//! Routes for the Todo items context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklane_core::pagination::PaginatedList;
use tasklane_todos::domain::commands::{
    CreateTodoItemCommand, DeleteTodoItemCommand, GetTodoItemsWithPaginationQuery,
    PurgeTodoItemsCommand, TodoItemBriefDto, UpdateTodoItemCommand, UpdateTodoItemDetailCommand,
};
use tasklane_todos::domain::priority::PriorityLevel;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateTodoItemRequest {
    pub title: Option<String>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Id of the new item.
    pub id: i64,
}

/// Query string for GET /.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodoItemsParams {
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
}

/// Request body for PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoItemRequest {
    /// Must match the route id when present.
    pub id: Option<i64>,
    pub title: Option<String>,
    #[serde(default)]
    pub done: bool,
}

/// Request body for PUT /{id}/detail.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoItemDetailRequest {
    /// Must match the route id when present.
    pub id: Option<i64>,
    #[serde(default)]
    pub priority: PriorityLevel,
    pub note: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

/// Response body for DELETE /.
#[derive(Debug, Serialize)]
pub struct PurgedResponse {
    /// Number of items deleted.
    pub purged: u64,
}

fn ensure_same_id(path: i64, body: Option<i64>) -> Result<(), ApiError> {
    match body {
        Some(body) if body != path => Err(ApiError::IdMismatch { path, body }),
        _ => Ok(()),
    }
}

/// POST /
#[instrument(skip(state, user, request))]
async fn create_todo_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTodoItemRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let command = CreateTodoItemCommand {
        title: request.title,
    };
    let id = state.mediator.send(command, &user).await?;
    info!(id, "todo item created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /
#[instrument(skip(state, user))]
async fn list_todo_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListTodoItemsParams>,
) -> Result<Json<PaginatedList<TodoItemBriefDto>>, ApiError> {
    let defaults = GetTodoItemsWithPaginationQuery::default();
    let query = GetTodoItemsWithPaginationQuery {
        page_number: params.page_number.unwrap_or(defaults.page_number),
        page_size: params.page_size.unwrap_or(defaults.page_size),
    };
    Ok(Json(state.mediator.send(query, &user).await?))
}

/// PUT /{id}
#[instrument(skip(state, user, request))]
async fn update_todo_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTodoItemRequest>,
) -> Result<StatusCode, ApiError> {
    ensure_same_id(id, request.id)?;
    let command = UpdateTodoItemCommand {
        id,
        title: request.title,
        done: request.done,
    };
    state.mediator.send(command, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /{id}/detail
#[instrument(skip(state, user, request))]
async fn update_todo_item_detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTodoItemDetailRequest>,
) -> Result<StatusCode, ApiError> {
    ensure_same_id(id, request.id)?;
    let command = UpdateTodoItemDetailCommand {
        id,
        priority: request.priority,
        note: request.note,
        reminder: request.reminder,
    };
    state.mediator.send(command, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{id}
#[instrument(skip(state, user))]
async fn delete_todo_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .mediator
        .send(DeleteTodoItemCommand { id }, &user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /
#[instrument(skip(state, user))]
async fn purge_todo_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PurgedResponse>, ApiError> {
    let purged = state.mediator.send(PurgeTodoItemsCommand, &user).await?;
    info!(purged, "todo items purged");
    Ok(Json(PurgedResponse { purged }))
}

/// Returns the router for the todo items context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_todo_items)
                .post(create_todo_item)
                .delete(purge_todo_items),
        )
        .route("/{id}", put(update_todo_item).delete(delete_todo_item))
        .route("/{id}/detail", put(update_todo_item_detail))
}
