//! Tasklane Identity — users, roles and named authorization policies.
//!
//! [`InMemoryIdentityService`] implements the core `IdentityService` trait.
//! Token issuance and sign-in live outside this service; it only answers
//! who a user is and what they may do.

pub mod password;
pub mod seed;
pub mod service;

pub use seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER_NAME, seed_defaults};
pub use service::{ADMINISTRATOR_ROLE, CAN_PURGE_POLICY, InMemoryIdentityService};
