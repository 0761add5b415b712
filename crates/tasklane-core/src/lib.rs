//! Tasklane Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the mediator,
//! the todo context and the persistence layer depend on. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod audit;
pub mod cancellation;
pub mod clock;
pub mod error;
pub mod event;
pub mod identity;
pub mod notification;
pub mod pagination;
pub mod principal;
