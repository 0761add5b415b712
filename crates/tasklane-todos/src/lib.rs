//! Tasklane — Todo items bounded context.
//!
//! Responsible for creating, updating, completing, deleting and listing todo
//! items, and for the domain events those changes raise.

pub mod application;
pub mod domain;

pub use application::{notification_bus, register};
