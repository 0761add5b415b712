//! Store trait for todo item rows.

use async_trait::async_trait;
use tasklane_core::error::AppError;

use crate::record::{CommitOutcome, PendingWrite, TodoRecord};

/// Backing storage for todo items.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Loads a single row by id.
    async fn find(&self, id: i64) -> Result<Option<TodoRecord>, AppError>;

    /// Loads one page of rows ordered by title, plus the total row count.
    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<TodoRecord>, u64), AppError>;

    /// Applies `writes` atomically: either all of them land or none do.
    async fn commit(&self, writes: Vec<PendingWrite>) -> Result<CommitOutcome, AppError>;
}
