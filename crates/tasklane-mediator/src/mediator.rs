//! Request dispatch keyed by request type.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tasklane_core::error::AppError;
use tasklane_core::identity::IdentityService;
use tracing::debug;

use crate::behaviours::{
    AuthorizationBehaviour, DEFAULT_LONG_RUNNING_THRESHOLD, PerformanceBehaviour,
    UnhandledExceptionBehaviour, ValidationBehaviour,
};
use crate::pipeline::Pipeline;
use crate::request::{Request, RequestContext, RequestHandler};
use crate::validation::Validator;

type AnyMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Dispatches each request to the pipeline registered for its type.
pub struct Mediator {
    pipelines: AnyMap,
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("pipelines", &self.pipelines.len())
            .finish()
    }
}

impl Mediator {
    /// Starts a builder wired to `identity` with the default slow-request
    /// threshold.
    pub fn builder(identity: Arc<dyn IdentityService>) -> MediatorBuilder {
        MediatorBuilder::new(identity, DEFAULT_LONG_RUNNING_THRESHOLD)
    }

    /// Runs `request` through its pipeline.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` when no handler is registered for `R`,
    /// otherwise whatever the pipeline returns.
    pub async fn send<R: Request>(
        &self,
        request: R,
        ctx: &RequestContext,
    ) -> Result<R::Response, AppError> {
        let pipeline = self
            .pipelines
            .get(&TypeId::of::<R>())
            .and_then(|pipeline| pipeline.downcast_ref::<Pipeline<R>>())
            .ok_or_else(|| {
                AppError::Unexpected(format!("no handler registered for {}", type_name::<R>()))
            })?;
        pipeline.execute(&request, ctx).await
    }

    /// Returns `true` when a pipeline is registered for `R`.
    #[must_use]
    pub fn has_handler<R: Request>(&self) -> bool {
        self.pipelines.contains_key(&TypeId::of::<R>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

struct ChainParts {
    identity: Arc<dyn IdentityService>,
    threshold: Duration,
    validators: AnyMap,
}

impl ChainParts {
    fn validators<R: Request>(&self) -> Vec<Arc<dyn Validator<R>>> {
        self.validators
            .get(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast_ref::<Vec<Arc<dyn Validator<R>>>>())
            .cloned()
            .unwrap_or_default()
    }
}

type Registration = Box<dyn FnOnce(&ChainParts) -> (TypeId, Box<dyn Any + Send + Sync>)>;

/// Collects handlers and validators, then composes the standard chain for
/// every registered request type:
///
/// `UnhandledException -> Authorization -> Validation -> Performance -> handler`
///
/// Validators may be added before or after their handler.
pub struct MediatorBuilder {
    parts: ChainParts,
    registrations: Vec<Registration>,
}

impl MediatorBuilder {
    pub fn new(identity: Arc<dyn IdentityService>, threshold: Duration) -> Self {
        Self {
            parts: ChainParts {
                identity,
                threshold,
                validators: HashMap::new(),
            },
            registrations: Vec::new(),
        }
    }

    /// Registers the handler for `R`, replacing any earlier one.
    #[must_use]
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.registrations.push(Box::new(move |parts: &ChainParts| {
            let validators = parts.validators::<R>();
            let pipeline = Pipeline::new(handler)
                .with_behaviour(UnhandledExceptionBehaviour)
                .with_behaviour(AuthorizationBehaviour::<R>::new(Arc::clone(&parts.identity)))
                .with_behaviour(ValidationBehaviour::new(validators))
                .with_behaviour(PerformanceBehaviour::new(
                    Arc::clone(&parts.identity),
                    parts.threshold,
                ));
            let boxed: Box<dyn Any + Send + Sync> = Box::new(pipeline);
            (TypeId::of::<R>(), boxed)
        }));
        self
    }

    /// Registers a fully composed pipeline for `R`, bypassing the standard
    /// chain.
    #[must_use]
    pub fn register_pipeline<R: Request>(mut self, pipeline: Pipeline<R>) -> Self {
        self.registrations.push(Box::new(move |_parts: &ChainParts| {
            let boxed: Box<dyn Any + Send + Sync> = Box::new(pipeline);
            (TypeId::of::<R>(), boxed)
        }));
        self
    }

    /// Adds a validator for `R`. Every validator registered for a type runs.
    #[must_use]
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        let entry = self
            .parts
            .validators
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Box::new(Vec::<Arc<dyn Validator<R>>>::new()));
        if let Some(validators) = entry.downcast_mut::<Vec<Arc<dyn Validator<R>>>>() {
            validators.push(Arc::new(validator));
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Mediator {
        let Self {
            parts,
            registrations,
        } = self;
        let pipelines: AnyMap = registrations
            .into_iter()
            .map(|register| register(&parts))
            .collect();
        debug!(request_types = pipelines.len(), "mediator built");
        Mediator { pipelines }
    }
}
