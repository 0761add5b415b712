//! Command handlers for the Todo items context.
//!
//! Each handler opens a request-scoped `TodoContext`, applies the command to
//! the aggregate and saves; audit stamping and event dispatch happen inside
//! the save.

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_mediator::{RequestContext, RequestHandler};
use tasklane_persistence::{TodoContext, TodoContextFactory, TrackedEntity};

use crate::domain::aggregates::TodoItem;
use crate::domain::commands::{
    CreateTodoItemCommand, DeleteTodoItemCommand, PurgeTodoItemsCommand, UpdateTodoItemCommand,
    UpdateTodoItemDetailCommand,
};

fn open(contexts: &TodoContextFactory<TodoItem>, ctx: &RequestContext) -> TodoContext<TodoItem> {
    contexts.create(ctx.principal.id.as_deref(), &ctx.cancellation)
}

async fn find_or_not_found(
    db: &mut TodoContext<TodoItem>,
    id: i64,
) -> Result<&mut TodoItem, AppError> {
    db.find(id)
        .await?
        .ok_or_else(|| AppError::not_found(TodoItem::NAME, id))
}

/// Handles `CreateTodoItemCommand`.
pub struct CreateTodoItemHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl CreateTodoItemHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<CreateTodoItemCommand> for CreateTodoItemHandler {
    async fn handle(
        &self,
        command: &CreateTodoItemCommand,
        ctx: &RequestContext,
    ) -> Result<i64, AppError> {
        let mut db = open(&self.contexts, ctx);
        let key = db.add(TodoItem::create(command.title.clone(), self.contexts.clock()));
        db.save_changes().await?;
        db.entity(key)
            .map(TodoItem::id)
            .ok_or_else(|| AppError::Unexpected("created todo item is no longer tracked".into()))
    }
}

/// Handles `UpdateTodoItemCommand`.
pub struct UpdateTodoItemHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl UpdateTodoItemHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<UpdateTodoItemCommand> for UpdateTodoItemHandler {
    async fn handle(&self, command: &UpdateTodoItemCommand, ctx: &RequestContext) -> Result<(), AppError> {
        let mut db = open(&self.contexts, ctx);
        let item = find_or_not_found(&mut db, command.id).await?;
        item.rename(command.title.clone());
        item.set_done(command.done, self.contexts.clock());
        db.save_changes().await?;
        Ok(())
    }
}

/// Handles `UpdateTodoItemDetailCommand`.
pub struct UpdateTodoItemDetailHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl UpdateTodoItemDetailHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<UpdateTodoItemDetailCommand> for UpdateTodoItemDetailHandler {
    async fn handle(
        &self,
        command: &UpdateTodoItemDetailCommand,
        ctx: &RequestContext,
    ) -> Result<(), AppError> {
        let mut db = open(&self.contexts, ctx);
        let item = find_or_not_found(&mut db, command.id).await?;
        item.update_detail(command.priority, command.note.clone(), command.reminder);
        db.save_changes().await?;
        Ok(())
    }
}

/// Handles `DeleteTodoItemCommand`.
pub struct DeleteTodoItemHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl DeleteTodoItemHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<DeleteTodoItemCommand> for DeleteTodoItemHandler {
    async fn handle(&self, command: &DeleteTodoItemCommand, ctx: &RequestContext) -> Result<(), AppError> {
        let mut db = open(&self.contexts, ctx);
        find_or_not_found(&mut db, command.id)
            .await?
            .mark_deleted(self.contexts.clock());
        db.remove(command.id);
        db.save_changes().await?;
        Ok(())
    }
}

/// Handles `PurgeTodoItemsCommand`.
pub struct PurgeTodoItemsHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl PurgeTodoItemsHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<PurgeTodoItemsCommand> for PurgeTodoItemsHandler {
    async fn handle(&self, _command: &PurgeTodoItemsCommand, ctx: &RequestContext) -> Result<u64, AppError> {
        let mut db = open(&self.contexts, ctx);
        let (items, _) = db.list_page(0, u32::MAX).await?;
        for id in items.iter().map(TodoItem::id) {
            if let Some(item) = db.find(id).await? {
                item.mark_deleted(self.contexts.clock());
                db.remove(id);
            }
        }
        db.save_changes().await
    }
}
