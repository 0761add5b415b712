//! Outermost behaviour: logs failures nothing downstream knows how to handle.

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tracing::error;

use crate::pipeline::{Next, PipelineBehaviour};
use crate::request::{Request, RequestContext};

/// Logs unexpected errors once at error level, with the request type and the
/// request itself, then returns the error unchanged. Expected failures
/// (authorization, validation, not found) pass through silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnhandledExceptionBehaviour;

#[async_trait]
impl<R: Request> PipelineBehaviour<R> for UnhandledExceptionBehaviour {
    async fn handle(
        &self,
        request: &R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> Result<R::Response, AppError> {
        let result = next.run(request, ctx).await;
        if let Some(err) = result.as_ref().err().filter(|err| !err.is_expected()) {
            error!(
                request_type = request.request_type(),
                error = %err,
                ?request,
                "unhandled error while processing request"
            );
        }
        result
    }
}
