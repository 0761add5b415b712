//! Identity and policy evaluation contract.

use async_trait::async_trait;

use crate::error::AppError;

/// Outcome of an identity management operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResult {
    /// Whether the operation succeeded.
    pub succeeded: bool,
    /// Error descriptions when it did not.
    pub errors: Vec<String>,
}

impl IdentityResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn failure<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            succeeded: false,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }
}

/// User lookup, role membership and named-policy evaluation.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Display name for `user_id`, if the user exists.
    async fn user_name(&self, user_id: &str) -> Result<Option<String>, AppError>;

    /// Whether `user_id` holds `role`.
    async fn is_in_role(&self, user_id: &str, role: &str) -> Result<bool, AppError>;

    /// Whether `user_id` satisfies the named policy.
    async fn authorize(&self, user_id: &str, policy_name: &str) -> Result<bool, AppError>;

    /// Creates a user and returns its identifier.
    async fn create_user(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<(IdentityResult, String), AppError>;

    /// Deletes a user.
    async fn delete_user(&self, user_id: &str) -> Result<IdentityResult, AppError>;
}
