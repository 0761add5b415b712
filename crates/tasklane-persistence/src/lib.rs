//! Tasklane Persistence — unit of work, save interceptors and todo item
//! stores.
//!
//! A [`TodoContext`] tracks the entities a request loads or adds. Calling
//! [`TodoContext::save_changes`] runs every [`SaveChangesInterceptor`] before
//! and after the store commit: audit stamping goes first, domain event
//! dispatch last.

pub mod context;
pub mod interceptors;
pub mod memory_store;
pub mod pg_todo_store;
pub mod record;
pub mod store;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use context::{TodoContext, TodoContextFactory};
pub use interceptors::{
    AuditableEntityInterceptor, DispatchDomainEventsInterceptor, SaveChangesInterceptor,
};
pub use memory_store::InMemoryTodoStore;
pub use pg_todo_store::PgTodoStore;
pub use record::{CommitOutcome, PendingWrite, TodoRecord};
pub use store::TodoStore;
pub use tracker::{ChangeTracker, EntityEntry, EntityState, EntryId, TrackedEntity};
