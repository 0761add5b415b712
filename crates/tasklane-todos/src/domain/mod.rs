//! Domain layer for the Todo items context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod priority;
