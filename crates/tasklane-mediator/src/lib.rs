//! Tasklane Mediator — request pipeline and in-process notifications.
//!
//! Every command and query is sent through a [`Mediator`], which runs the
//! behaviour chain registered for the request type before the handler:
//!
//! ```text
//! UnhandledException -> Authorization -> Validation -> Performance -> handler
//! ```
//!
//! Domain events raised during a save are fanned out to subscribers through
//! a [`NotificationBus`].

pub mod behaviours;
pub mod mediator;
pub mod notification;
pub mod pipeline;
pub mod request;
pub mod validation;

pub use mediator::{Mediator, MediatorBuilder};
pub use notification::{NotificationBus, NotificationHandler, NotificationPublisher};
pub use pipeline::{Next, Pipeline, PipelineBehaviour};
pub use request::{Authorize, Request, RequestContext, RequestHandler};
pub use validation::Validator;
