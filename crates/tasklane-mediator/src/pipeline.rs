//! Behaviour chain composition.

use std::sync::Arc;

use async_trait::async_trait;
use tasklane_core::error::AppError;

use crate::request::{Request, RequestContext, RequestHandler};

/// One stage of the request-processing chain.
///
/// A behaviour may short-circuit by returning an error without calling
/// `next`, or observe the downstream result after awaiting it.
#[async_trait]
pub trait PipelineBehaviour<R: Request>: Send + Sync {
    /// Runs this stage; `next` runs the remaining stages and the handler.
    async fn handle(
        &self,
        request: &R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> Result<R::Response, AppError>;
}

/// The remainder of a chain: the behaviours not yet run plus the handler.
pub struct Next<'a, R: Request> {
    behaviours: &'a [Arc<dyn PipelineBehaviour<R>>],
    handler: &'a dyn RequestHandler<R>,
}

impl<R: Request> Next<'_, R> {
    /// Runs the next behaviour, or the handler when none remain.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a downstream behaviour or the
    /// handler.
    pub async fn run(self, request: &R, ctx: &RequestContext) -> Result<R::Response, AppError> {
        match self.behaviours.split_first() {
            Some((behaviour, rest)) => {
                let next = Next {
                    behaviours: rest,
                    handler: self.handler,
                };
                behaviour.handle(request, ctx, next).await
            }
            None => {
                ctx.cancellation.check()?;
                self.handler.handle(request, ctx).await
            }
        }
    }
}

/// An ordered behaviour chain terminating in a handler.
pub struct Pipeline<R: Request> {
    behaviours: Vec<Arc<dyn PipelineBehaviour<R>>>,
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    /// A chain with no behaviours.
    pub fn new(handler: Arc<dyn RequestHandler<R>>) -> Self {
        Self {
            behaviours: Vec::new(),
            handler,
        }
    }

    /// Appends `behaviour` inside the ones already added.
    #[must_use]
    pub fn with_behaviour(mut self, behaviour: impl PipelineBehaviour<R> + 'static) -> Self {
        self.behaviours.push(Arc::new(behaviour));
        self
    }

    /// Number of behaviours wrapped around the handler.
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviours.is_empty()
    }

    /// Runs the chain outermost-first.
    ///
    /// # Errors
    ///
    /// Returns the first error raised along the chain.
    pub async fn execute(&self, request: &R, ctx: &RequestContext) -> Result<R::Response, AppError> {
        let next = Next {
            behaviours: &self.behaviours,
            handler: self.handler.as_ref(),
        };
        next.run(request, ctx).await
    }
}
