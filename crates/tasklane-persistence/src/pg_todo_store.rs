//! `PostgreSQL` implementation of the `TodoStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tasklane_core::error::AppError;
use tracing::debug;

use crate::record::{CommitOutcome, PendingWrite, TodoRecord};
use crate::store::TodoStore;

const SELECT_COLUMNS: &str = "SELECT id, title, note, priority, reminder, done, \
     created, created_by, last_modified, last_modified_by FROM todo_items";

/// Maps a driver error onto the application taxonomy.
pub fn data_layer(err: sqlx::Error) -> AppError {
    AppError::DataLayer(err.to_string())
}

/// PostgreSQL-backed todo item store.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Creates a new `PgTodoStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn find(&self, id: i64) -> Result<Option<TodoRecord>, AppError> {
        sqlx::query_as::<_, TodoRecord>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(data_layer)
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<TodoRecord>, u64), AppError> {
        let offset = i64::try_from(offset)
            .map_err(|_| AppError::DataLayer(format!("page offset {offset} out of range")))?;

        let rows = sqlx::query_as::<_, TodoRecord>(&format!(
            "{SELECT_COLUMNS} ORDER BY title, id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(data_layer)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_items")
            .fetch_one(&self.pool)
            .await
            .map_err(data_layer)?;

        Ok((rows, u64::try_from(total).unwrap_or_default()))
    }

    async fn commit(&self, writes: Vec<PendingWrite>) -> Result<CommitOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(data_layer)?;
        let mut outcome = CommitOutcome::default();

        for write in writes {
            match write {
                PendingWrite::Insert(record) => {
                    let id: i64 = sqlx::query_scalar(
                        r"
                        INSERT INTO todo_items
                            (title, note, priority, reminder, done,
                             created, created_by, last_modified, last_modified_by)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                        RETURNING id
                        ",
                    )
                    .bind(&record.title)
                    .bind(&record.note)
                    .bind(record.priority)
                    .bind(record.reminder)
                    .bind(record.done)
                    .bind(record.created)
                    .bind(&record.created_by)
                    .bind(record.last_modified)
                    .bind(&record.last_modified_by)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(data_layer)?;
                    outcome.inserted_ids.push(id);
                    outcome.rows_affected += 1;
                }
                PendingWrite::Update(record) => {
                    let result = sqlx::query(
                        r"
                        UPDATE todo_items
                        SET title = $2, note = $3, priority = $4, reminder = $5, done = $6,
                            created = $7, created_by = $8,
                            last_modified = $9, last_modified_by = $10
                        WHERE id = $1
                        ",
                    )
                    .bind(record.id)
                    .bind(&record.title)
                    .bind(&record.note)
                    .bind(record.priority)
                    .bind(record.reminder)
                    .bind(record.done)
                    .bind(record.created)
                    .bind(&record.created_by)
                    .bind(record.last_modified)
                    .bind(&record.last_modified_by)
                    .execute(&mut *tx)
                    .await
                    .map_err(data_layer)?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::DataLayer(format!(
                            "update affected no rows for todo item {}",
                            record.id
                        )));
                    }
                    outcome.rows_affected += result.rows_affected();
                }
                PendingWrite::Delete(id) => {
                    let result = sqlx::query("DELETE FROM todo_items WHERE id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(data_layer)?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::DataLayer(format!(
                            "delete affected no rows for todo item {id}"
                        )));
                    }
                    outcome.rows_affected += result.rows_affected();
                }
            }
        }

        tx.commit().await.map_err(data_layer)?;
        debug!(
            rows_affected = outcome.rows_affected,
            inserted = outcome.inserted_ids.len(),
            "todo items committed"
        );
        Ok(outcome)
    }
}
