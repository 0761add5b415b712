//! Row-level types exchanged with a `TodoStore`.

use chrono::{DateTime, Utc};

/// One row of the `todo_items` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct TodoRecord {
    pub id: i64,
    pub title: Option<String>,
    pub note: Option<String>,
    pub priority: i16,
    pub reminder: Option<DateTime<Utc>>,
    pub done: bool,
    pub created: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub last_modified_by: Option<String>,
}

/// A single write produced by the change tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    /// Insert a new row; the store assigns the id.
    Insert(TodoRecord),
    /// Overwrite the row with the record's id.
    Update(TodoRecord),
    /// Delete the row with this id.
    Delete(i64),
}

/// What a successful commit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Total rows inserted, updated or deleted.
    pub rows_affected: u64,
    /// Ids assigned to inserted rows, in the order the inserts were given.
    pub inserted_ids: Vec<i64>,
}
