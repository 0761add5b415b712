//! Runs every registered validator before the handler.

use std::sync::Arc;

use async_trait::async_trait;
use tasklane_core::error::{AppError, ValidationErrors};
use tracing::debug;

use crate::pipeline::{Next, PipelineBehaviour};
use crate::request::{Request, RequestContext};
use crate::validation::Validator;

/// Evaluates all validators for `R` and fails with the grouped failures when
/// any rule fails. With no validators registered the request passes straight
/// through.
pub struct ValidationBehaviour<R> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R> ValidationBehaviour<R> {
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl<R: Request> PipelineBehaviour<R> for ValidationBehaviour<R> {
    async fn handle(
        &self,
        request: &R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> Result<R::Response, AppError> {
        let failures: Vec<_> = self
            .validators
            .iter()
            .flat_map(|validator| validator.validate(request))
            .collect();

        if !failures.is_empty() {
            let errors = ValidationErrors::from_failures(failures);
            debug!(
                request_type = request.request_type(),
                fields = errors.len(),
                "request failed validation"
            );
            return Err(AppError::Validation(errors));
        }

        next.run(request, ctx).await
    }
}
