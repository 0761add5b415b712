//! Route modules.

pub mod health;
pub mod todo_items;
