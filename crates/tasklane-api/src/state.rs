//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use tasklane_core::cancellation::CancellationSignal;
use tasklane_core::clock::Clock;
use tasklane_core::identity::IdentityService;
use tasklane_mediator::{Mediator, MediatorBuilder};
use tasklane_persistence::{TodoContextFactory, TodoStore};
use tasklane_todos::domain::aggregates::TodoItem;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dispatches every command and query.
    pub mediator: Arc<Mediator>,
    /// Root of every request's cancellation signal; cancelled on shutdown.
    pub shutdown: CancellationSignal,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(mediator: Arc<Mediator>) -> Self {
        Self {
            mediator,
            shutdown: CancellationSignal::new(),
        }
    }

    /// Replaces the root signal that in-flight requests are cancelled from.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Wires the todo items context over `store` and returns the state.
    ///
    /// Domain events raised on save go to the todo items notification bus.
    #[must_use]
    pub fn assemble(
        store: Arc<dyn TodoStore>,
        identity: Arc<dyn IdentityService>,
        clock: Arc<dyn Clock>,
        long_running_threshold: Duration,
    ) -> Self {
        let contexts = TodoContextFactory::<TodoItem>::new(
            store,
            clock,
            Arc::new(tasklane_todos::notification_bus()),
        );
        let builder = MediatorBuilder::new(identity, long_running_threshold);
        let mediator = tasklane_todos::register(builder, &contexts).build();
        Self::new(Arc::new(mediator))
    }
}
