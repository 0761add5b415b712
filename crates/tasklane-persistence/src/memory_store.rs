//! In-memory `TodoStore` for tests and database-less local runs.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tasklane_core::error::AppError;

use crate::record::{CommitOutcome, PendingWrite, TodoRecord};
use crate::store::TodoStore;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, TodoRecord>,
}

/// Keeps rows in a map behind a mutex. A commit is applied to a copy of the
/// table and swapped in only when every write succeeded.
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    table: Mutex<Table>,
}

impl InMemoryTodoStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, AppError> {
        self.table
            .lock()
            .map_err(|_| AppError::DataLayer("in-memory store lock poisoned".into()))
    }

    /// Number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataLayer` if the store lock is poisoned.
    pub fn count(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.rows.len())
    }
}

fn title_order(a: &TodoRecord, b: &TodoRecord) -> std::cmp::Ordering {
    // NULL titles sort last, like PostgreSQL's default ascending order.
    (a.title.is_none(), &a.title, a.id).cmp(&(b.title.is_none(), &b.title, b.id))
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find(&self, id: i64) -> Result<Option<TodoRecord>, AppError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<TodoRecord>, u64), AppError> {
        let table = self.lock()?;
        let mut rows: Vec<&TodoRecord> = table.rows.values().collect();
        rows.sort_by(|a, b| title_order(a, b));
        let total = rows.len() as u64;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let page = rows.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((page, total))
    }

    async fn commit(&self, writes: Vec<PendingWrite>) -> Result<CommitOutcome, AppError> {
        let mut table = self.lock()?;
        let mut last_id = table.last_id;
        let mut rows = table.rows.clone();
        let mut outcome = CommitOutcome::default();

        for write in writes {
            match write {
                PendingWrite::Insert(mut record) => {
                    last_id += 1;
                    record.id = last_id;
                    rows.insert(last_id, record);
                    outcome.inserted_ids.push(last_id);
                }
                PendingWrite::Update(record) => {
                    let Some(row) = rows.get_mut(&record.id) else {
                        return Err(AppError::DataLayer(format!(
                            "update affected no rows for todo item {}",
                            record.id
                        )));
                    };
                    *row = record;
                }
                PendingWrite::Delete(id) => {
                    if rows.remove(&id).is_none() {
                        return Err(AppError::DataLayer(format!(
                            "delete affected no rows for todo item {id}"
                        )));
                    }
                }
            }
            outcome.rows_affected += 1;
        }

        table.last_id = last_id;
        table.rows = rows;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>) -> TodoRecord {
        TodoRecord {
            title: title.map(str::to_owned),
            ..TodoRecord::default()
        }
    }

    #[tokio::test]
    async fn test_inserts_are_assigned_increasing_ids() {
        // Arrange
        let store = InMemoryTodoStore::new();

        // Act
        let outcome = store
            .commit(vec![
                PendingWrite::Insert(record(Some("a"))),
                PendingWrite::Insert(record(Some("b"))),
            ])
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome.rows_affected, 2);
        assert_eq!(outcome.inserted_ids, vec![1, 2]);
        assert_eq!(store.find(2).await.unwrap().unwrap().title.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_table_untouched() {
        // Arrange
        let store = InMemoryTodoStore::new();

        // Act
        let result = store
            .commit(vec![
                PendingWrite::Insert(record(Some("kept?"))),
                PendingWrite::Delete(42),
            ])
            .await;

        // Assert
        assert!(matches!(result, Err(AppError::DataLayer(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_orders_by_title_with_missing_titles_last() {
        // Arrange
        let store = InMemoryTodoStore::new();
        store
            .commit(vec![
                PendingWrite::Insert(record(None)),
                PendingWrite::Insert(record(Some("Walk dog"))),
                PendingWrite::Insert(record(Some("Buy milk"))),
                PendingWrite::Insert(record(Some("Pay rent"))),
            ])
            .await
            .unwrap();

        // Act
        let (first, total) = store.page(0, 2).await.unwrap();
        let (rest, _) = store.page(2, 2).await.unwrap();

        // Assert
        assert_eq!(total, 4);
        let titles: Vec<_> = first.iter().chain(&rest).map(|r| r.title.clone()).collect();
        assert_eq!(
            titles,
            vec![
                Some("Buy milk".to_owned()),
                Some("Pay rent".to_owned()),
                Some("Walk dog".to_owned()),
                None,
            ]
        );
    }

    #[tokio::test]
    async fn test_update_replaces_row() {
        let store = InMemoryTodoStore::new();
        store
            .commit(vec![PendingWrite::Insert(record(Some("old")))])
            .await
            .unwrap();

        let mut updated = store.find(1).await.unwrap().unwrap();
        updated.done = true;
        store
            .commit(vec![PendingWrite::Update(updated)])
            .await
            .unwrap();

        assert!(store.find(1).await.unwrap().unwrap().done);
    }
}
