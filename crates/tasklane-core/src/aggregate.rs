//! Aggregate root abstraction.

use crate::event::DomainEvent;

/// Trait for entities that buffer domain events until they are persisted.
///
/// The buffer is only appended to by the aggregate's own business methods;
/// outside code may read it and, once the events have been handed off, clear
/// it.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate raises.
    type Event: DomainEvent + Clone;

    /// Returns the events raised since the last save, oldest first.
    fn domain_events(&self) -> &[Self::Event];

    /// Empties the event buffer.
    fn clear_domain_events(&mut self);
}
