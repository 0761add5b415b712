//! Request validators for the Todo items context.

use tasklane_core::error::ValidationFailure;
use tasklane_mediator::Validator;
use tasklane_mediator::validation::rules;

use crate::domain::commands::{
    CreateTodoItemCommand, GetTodoItemsWithPaginationQuery, UpdateTodoItemCommand,
    UpdateTodoItemDetailCommand,
};

/// Maximum title length in characters.
pub const TITLE_MAX_LENGTH: usize = 200;
/// Maximum note length in characters.
pub const NOTE_MAX_LENGTH: usize = 2000;

fn title_rules(title: Option<&str>) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    rules::not_empty("Title", title, &mut failures);
    rules::max_length("Title", title, TITLE_MAX_LENGTH, &mut failures);
    failures
}

pub struct CreateTodoItemCommandValidator;

impl Validator<CreateTodoItemCommand> for CreateTodoItemCommandValidator {
    fn validate(&self, request: &CreateTodoItemCommand) -> Vec<ValidationFailure> {
        title_rules(request.title.as_deref())
    }
}

pub struct UpdateTodoItemCommandValidator;

impl Validator<UpdateTodoItemCommand> for UpdateTodoItemCommandValidator {
    fn validate(&self, request: &UpdateTodoItemCommand) -> Vec<ValidationFailure> {
        title_rules(request.title.as_deref())
    }
}

pub struct UpdateTodoItemDetailCommandValidator;

impl Validator<UpdateTodoItemDetailCommand> for UpdateTodoItemDetailCommandValidator {
    fn validate(&self, request: &UpdateTodoItemDetailCommand) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        rules::max_length("Note", request.note.as_deref(), NOTE_MAX_LENGTH, &mut failures);
        failures
    }
}

pub struct GetTodoItemsWithPaginationQueryValidator;

impl Validator<GetTodoItemsWithPaginationQuery> for GetTodoItemsWithPaginationQueryValidator {
    fn validate(&self, request: &GetTodoItemsWithPaginationQuery) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        rules::at_least("PageNumber", i64::from(request.page_number), 1, &mut failures);
        rules::at_least("PageSize", i64::from(request.page_size), 1, &mut failures);
        failures
    }
}
