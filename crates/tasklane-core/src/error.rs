//! Application error types.

use serde::Serialize;
use serde::ser::SerializeMap;
use thiserror::Error;

/// Top-level error type shared by the pipeline, handlers and persistence.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authorization is required but the caller has no identity.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller is authenticated but fails a role or policy check.
    #[error("access forbidden")]
    Forbidden,

    /// One or more validation rules failed.
    #[error("one or more validation failures have occurred")]
    Validation(ValidationErrors),

    /// A referenced entity does not exist.
    #[error("{entity} ({key}) was not found")]
    NotFound {
        /// The entity name.
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// The underlying store rejected or failed a read or write.
    #[error("data layer error: {0}")]
    DataLayer(String),

    /// A notification subscriber failed while a domain event was published.
    #[error("publish error: {0}")]
    Publish(String),

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Creates a `NotFound` error for the given entity and key.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns `true` for failures callers are expected to translate into a
    /// client-facing response (authorization, validation, missing entities).
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Forbidden | Self::Validation(_) | Self::NotFound { .. }
        )
    }
}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The field the rule applies to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationFailure {
    /// Creates a new failure for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failures grouped by field.
///
/// Fields keep the order of their first failure; messages keep the order in
/// which the rules were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Groups `failures` by field.
    #[must_use]
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        let mut errors = Self::default();
        for failure in failures {
            errors.push(failure.field, failure.message);
        }
        errors
    }

    /// Appends a message for `field`.
    pub fn push(&mut self, field: String, message: String) {
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Field names in first-occurrence order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of distinct fields with failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}
