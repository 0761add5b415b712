//! Query handlers for the Todo items context.

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::pagination::PaginatedList;
use tasklane_mediator::{RequestContext, RequestHandler};
use tasklane_persistence::TodoContextFactory;

use crate::domain::aggregates::TodoItem;
use crate::domain::commands::{GetTodoItemsWithPaginationQuery, TodoItemBriefDto};

/// Handles `GetTodoItemsWithPaginationQuery`. Reads are untracked.
pub struct GetTodoItemsWithPaginationHandler {
    contexts: TodoContextFactory<TodoItem>,
}

impl GetTodoItemsWithPaginationHandler {
    #[must_use]
    pub fn new(contexts: TodoContextFactory<TodoItem>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl RequestHandler<GetTodoItemsWithPaginationQuery> for GetTodoItemsWithPaginationHandler {
    async fn handle(
        &self,
        query: &GetTodoItemsWithPaginationQuery,
        ctx: &RequestContext,
    ) -> Result<PaginatedList<TodoItemBriefDto>, AppError> {
        let page_number = u32::try_from(query.page_number).unwrap_or(1).max(1);
        let page_size = u32::try_from(query.page_size).unwrap_or(1).max(1);

        let db = self
            .contexts
            .create(ctx.principal.id.as_deref(), &ctx.cancellation);
        let offset = PaginatedList::<TodoItemBriefDto>::offset(page_number, page_size);
        let (items, total_count) = db.list_page(offset, page_size).await?;

        let items = items.iter().map(TodoItemBriefDto::from).collect();
        Ok(PaginatedList::new(items, total_count, page_number, page_size))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tasklane_persistence::{InMemoryTodoStore, PendingWrite, TodoRecord, TodoStore};
    use tasklane_test_support::{FixedClock, RecordingPublisher};

    use super::*;
    use crate::domain::events::TodoItemEvent;

    async fn seeded(titles: &[Option<&str>]) -> TodoContextFactory<TodoItem> {
        let store = Arc::new(InMemoryTodoStore::new());
        let writes = titles
            .iter()
            .map(|title| {
                PendingWrite::Insert(TodoRecord {
                    title: title.map(str::to_owned),
                    ..TodoRecord::default()
                })
            })
            .collect();
        store.commit(writes).await.unwrap();
        TodoContextFactory::new(
            store,
            Arc::new(FixedClock::default()),
            Arc::new(RecordingPublisher::<TodoItemEvent>::new()),
        )
    }

    fn query(page_number: i32, page_size: i32) -> GetTodoItemsWithPaginationQuery {
        GetTodoItemsWithPaginationQuery {
            page_number,
            page_size,
        }
    }

    #[tokio::test]
    async fn test_first_page_is_ordered_by_title() {
        // Arrange
        let contexts = seeded(&[Some("cherry"), Some("apple"), Some("banana")]).await;
        let handler = GetTodoItemsWithPaginationHandler::new(contexts);

        // Act
        let page = handler
            .handle(&query(1, 2), &RequestContext::anonymous())
            .await
            .unwrap();

        // Assert
        let titles: Vec<_> = page
            .items()
            .iter()
            .map(|dto| dto.title.as_deref())
            .collect();
        assert_eq!(titles, vec![Some("apple"), Some("banana")]);
        assert_eq!(page.total_count(), 3);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_previous_page());
        assert!(page.has_next_page());
    }

    #[tokio::test]
    async fn test_last_page_holds_the_remainder() {
        let contexts = seeded(&[Some("cherry"), Some("apple"), Some("banana")]).await;
        let handler = GetTodoItemsWithPaginationHandler::new(contexts);

        let page = handler
            .handle(&query(2, 2), &RequestContext::anonymous())
            .await
            .unwrap();

        assert_eq!(page.items().len(), 1);
        assert_eq!(page.items()[0].title.as_deref(), Some("cherry"));
        assert!(page.has_previous_page());
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let contexts = seeded(&[Some("only")]).await;
        let handler = GetTodoItemsWithPaginationHandler::new(contexts);

        let page = handler
            .handle(&query(5, 10), &RequestContext::anonymous())
            .await
            .unwrap();

        assert!(page.items().is_empty());
        assert_eq!(page.total_count(), 1);
        assert_eq!(page.page_number(), 5);
    }

    #[tokio::test]
    async fn test_untitled_items_sort_last() {
        let contexts = seeded(&[None, Some("zebra")]).await;
        let handler = GetTodoItemsWithPaginationHandler::new(contexts);

        let page = handler
            .handle(&query(1, 10), &RequestContext::anonymous())
            .await
            .unwrap();

        let titles: Vec<_> = page
            .items()
            .iter()
            .map(|dto| dto.title.as_deref())
            .collect();
        assert_eq!(titles, vec![Some("zebra"), None]);
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_page() {
        let contexts = seeded(&[]).await;
        let handler = GetTodoItemsWithPaginationHandler::new(contexts);

        let page = handler
            .handle(&GetTodoItemsWithPaginationQuery::default(), &RequestContext::anonymous())
            .await
            .unwrap();

        assert!(page.items().is_empty());
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next_page());
    }
}
