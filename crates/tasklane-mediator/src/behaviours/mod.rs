//! The standard pipeline behaviours, outermost first.

mod authorization;
mod performance;
mod unhandled;
mod validation;

pub use authorization::AuthorizationBehaviour;
pub use performance::{DEFAULT_LONG_RUNNING_THRESHOLD, PerformanceBehaviour};
pub use unhandled::UnhandledExceptionBehaviour;
pub use validation::ValidationBehaviour;
