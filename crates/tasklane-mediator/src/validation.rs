//! Request validators.

use tasklane_core::error::ValidationFailure;

/// Checks one request type and reports every rule it breaks.
pub trait Validator<R>: Send + Sync {
    /// Returns all failures; an empty list means the request is valid.
    fn validate(&self, request: &R) -> Vec<ValidationFailure>;
}

/// Rule helpers shared by validators.
pub mod rules {
    use tasklane_core::error::ValidationFailure;

    /// Fails when `value` is missing or only whitespace.
    pub fn not_empty(field: &str, value: Option<&str>, failures: &mut Vec<ValidationFailure>) {
        if value.is_none_or(|value| value.trim().is_empty()) {
            failures.push(ValidationFailure::new(
                field,
                format!("'{field}' must not be empty."),
            ));
        }
    }

    /// Fails when `value` is longer than `max` characters.
    pub fn max_length(
        field: &str,
        value: Option<&str>,
        max: usize,
        failures: &mut Vec<ValidationFailure>,
    ) {
        if value.is_some_and(|value| value.chars().count() > max) {
            failures.push(ValidationFailure::new(
                field,
                format!("The length of '{field}' must be {max} characters or fewer."),
            ));
        }
    }

    /// Fails when `value` is below `min`.
    pub fn at_least(field: &str, value: i64, min: i64, failures: &mut Vec<ValidationFailure>) {
        if value < min {
            failures.push(ValidationFailure::new(
                field,
                format!("'{field}' must be greater than or equal to '{min}'."),
            ));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_not_empty_rejects_missing_and_blank() {
            let mut failures = Vec::new();

            not_empty("Title", None, &mut failures);
            not_empty("Title", Some("   "), &mut failures);
            not_empty("Title", Some("Buy milk"), &mut failures);

            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].message, "'Title' must not be empty.");
        }

        #[test]
        fn test_max_length_counts_characters() {
            let mut failures = Vec::new();

            max_length("Title", Some("ééé"), 3, &mut failures);
            max_length("Title", Some("abcd"), 3, &mut failures);
            max_length("Title", None, 3, &mut failures);

            assert_eq!(failures.len(), 1);
            assert_eq!(
                failures[0].message,
                "The length of 'Title' must be 3 characters or fewer."
            );
        }

        #[test]
        fn test_at_least() {
            let mut failures = Vec::new();

            at_least("PageNumber", 0, 1, &mut failures);
            at_least("PageSize", 1, 1, &mut failures);

            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].field, "PageNumber");
        }
    }
}
