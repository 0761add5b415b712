//! Requests, handlers and the per-request context.

use std::fmt::Debug;

use async_trait::async_trait;
use tasklane_core::cancellation::CancellationSignal;
use tasklane_core::error::AppError;
use tasklane_core::principal::Principal;

/// An authorization requirement attached to a request type.
///
/// `roles` is a comma-separated list; names are trimmed before they are
/// compared with the caller's roles. A requirement with neither roles nor a
/// policy only demands an authenticated caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authorize {
    /// Comma-separated role names, any of which grants access.
    pub roles: Option<&'static str>,
    /// Named policy evaluated by the identity service.
    pub policy: Option<&'static str>,
}

impl Authorize {
    /// Requires only an authenticated caller.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self {
            roles: None,
            policy: None,
        }
    }

    /// Requires one of the comma-separated `roles`.
    #[must_use]
    pub const fn roles(roles: &'static str) -> Self {
        Self {
            roles: Some(roles),
            policy: None,
        }
    }

    /// Requires the named `policy`.
    #[must_use]
    pub const fn policy(policy: &'static str) -> Self {
        Self {
            roles: None,
            policy: Some(policy),
        }
    }

    /// Requires one of `roles` and the named `policy`.
    #[must_use]
    pub const fn roles_and_policy(roles: &'static str, policy: &'static str) -> Self {
        Self {
            roles: Some(roles),
            policy: Some(policy),
        }
    }

    /// Trimmed, non-empty role names, or `None` when the role list is blank.
    #[must_use]
    pub fn role_names(&self) -> Option<Vec<&'static str>> {
        let roles = self.roles.filter(|roles| !roles.trim().is_empty())?;
        Some(
            roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .collect(),
        )
    }

    /// The policy name, or `None` when it is blank.
    #[must_use]
    pub fn policy_name(&self) -> Option<&'static str> {
        self.policy.filter(|policy| !policy.trim().is_empty())
    }
}

/// A command or query dispatched through the mediator.
pub trait Request: Send + Sync + Debug + 'static {
    /// What the handler returns on success.
    type Response: Send + 'static;

    /// Authorization requirements for this request type. Empty means the
    /// request is open to anyone.
    const AUTHORIZE: &'static [Authorize] = &[];

    /// The type name for this request (for logging).
    fn request_type(&self) -> &'static str;
}

/// Terminal unit implementing one request's business logic.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Handles `request` on behalf of the caller described by `ctx`.
    async fn handle(&self, request: &R, ctx: &RequestContext) -> Result<R::Response, AppError>;
}

/// Per-call state passed explicitly through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// The caller.
    pub principal: Principal,
    /// Cancellation signal for this call.
    pub cancellation: CancellationSignal,
}

impl RequestContext {
    #[must_use]
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            cancellation: CancellationSignal::new(),
        }
    }

    /// A context for an unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replaces the cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = cancellation;
        self
    }
}
