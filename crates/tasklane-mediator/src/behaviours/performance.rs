//! Request timing and audit logging.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::identity::IdentityService;
use tracing::{debug, info, warn};

use crate::pipeline::{Next, PipelineBehaviour};
use crate::request::{Request, RequestContext};

/// Requests slower than this are logged at warn level unless configured
/// otherwise.
pub const DEFAULT_LONG_RUNNING_THRESHOLD: Duration = Duration::from_millis(500);

/// Innermost behaviour: logs who sent the request and how long the handler
/// took. The caller's display name is looked up once per request, before
/// timing starts; a failed lookup is logged at debug and otherwise ignored.
pub struct PerformanceBehaviour {
    identity: Arc<dyn IdentityService>,
    threshold: Duration,
}

impl PerformanceBehaviour {
    pub fn new(identity: Arc<dyn IdentityService>, threshold: Duration) -> Self {
        Self {
            identity,
            threshold,
        }
    }

    async fn display_name(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        match self.identity.user_name(user_id).await {
            Ok(name) => name,
            Err(err) => {
                debug!(user_id, error = %err, "user name lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehaviour<R> for PerformanceBehaviour {
    async fn handle(
        &self,
        request: &R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> Result<R::Response, AppError> {
        let user_id = ctx.principal.id.as_deref();
        let user_name = self.display_name(user_id).await;

        let started = Instant::now();
        let result = next.run(request, ctx).await;
        let elapsed = started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        if elapsed > self.threshold {
            warn!(
                request_type = request.request_type(),
                elapsed_ms,
                user_id = user_id.unwrap_or_default(),
                user_name = user_name.as_deref().unwrap_or_default(),
                ?request,
                "long running request"
            );
        } else {
            info!(
                request_type = request.request_type(),
                elapsed_ms,
                user_id = user_id.unwrap_or_default(),
                user_name = user_name.as_deref().unwrap_or_default(),
                "request handled"
            );
        }

        result
    }
}
