//! Role- and policy-based authorization.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::identity::IdentityService;
use tasklane_core::principal::Principal;
use tracing::debug;

use crate::pipeline::{Next, PipelineBehaviour};
use crate::request::{Authorize, Request, RequestContext};

/// Enforces `Request::AUTHORIZE` before anything downstream runs.
///
/// Role lists from every requirement are flattened into one set: holding any
/// one of those roles passes the role check. Every policy must pass, checked
/// in declaration order, stopping at the first denial.
pub struct AuthorizationBehaviour<R> {
    identity: Arc<dyn IdentityService>,
    _request: PhantomData<fn(R)>,
}

impl<R> AuthorizationBehaviour<R> {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self {
            identity,
            _request: PhantomData,
        }
    }
}

fn passes_role_check(requirements: &[Authorize], principal: &Principal) -> bool {
    let mut role_groups = requirements.iter().filter_map(Authorize::role_names).peekable();
    if role_groups.peek().is_none() {
        return true;
    }
    role_groups
        .flatten()
        .any(|role| principal.is_in_role(role))
}

#[async_trait]
impl<R: Request> PipelineBehaviour<R> for AuthorizationBehaviour<R> {
    async fn handle(
        &self,
        request: &R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> Result<R::Response, AppError> {
        let requirements = R::AUTHORIZE;
        if requirements.is_empty() {
            return next.run(request, ctx).await;
        }

        let Some(user_id) = ctx.principal.id.as_deref() else {
            debug!(request_type = request.request_type(), "rejecting anonymous caller");
            return Err(AppError::Unauthenticated);
        };

        if !passes_role_check(requirements, &ctx.principal) {
            debug!(
                request_type = request.request_type(),
                user_id, "caller holds none of the required roles"
            );
            return Err(AppError::Forbidden);
        }

        for policy in requirements.iter().filter_map(Authorize::policy_name) {
            ctx.cancellation.check()?;
            if !self.identity.authorize(user_id, policy).await? {
                debug!(
                    request_type = request.request_type(),
                    user_id, policy, "policy denied"
                );
                return Err(AppError::Forbidden);
            }
        }

        next.run(request, ctx).await
    }
}
