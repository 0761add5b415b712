//! Shared test doubles for the Tasklane todo service.

mod clock;
mod identity;
mod publisher;

pub use clock::{FixedClock, fixed_now};
pub use identity::StubIdentityService;
pub use publisher::{FailingPublisher, RecordingPublisher};
