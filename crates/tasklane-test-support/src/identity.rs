//! Stub identity service — records calls and answers from configured tables.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::identity::{IdentityResult, IdentityService};

/// An `IdentityService` whose answers are configured up front. Every
/// `authorize` and `user_name` call is recorded so tests can assert on how
/// often (and in which order) the pipeline consulted it.
#[derive(Debug, Default)]
pub struct StubIdentityService {
    user_names: HashMap<String, String>,
    policies: HashMap<String, bool>,
    authorize_calls: Mutex<Vec<(String, String)>>,
    user_name_calls: Mutex<Vec<String>>,
}

impl StubIdentityService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a display name for `user_id`.
    #[must_use]
    pub fn with_user(mut self, user_id: &str, user_name: &str) -> Self {
        self.user_names
            .insert(user_id.to_owned(), user_name.to_owned());
        self
    }

    /// Sets the answer `authorize` gives for `policy`. Unknown policies are
    /// denied.
    #[must_use]
    pub fn with_policy(mut self, policy: &str, allowed: bool) -> Self {
        self.policies.insert(policy.to_owned(), allowed);
        self
    }

    /// All `(user_id, policy)` pairs passed to `authorize`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn authorize_calls(&self) -> Vec<(String, String)> {
        self.authorize_calls.lock().unwrap().clone()
    }

    /// All user ids passed to `user_name`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn user_name_calls(&self) -> Vec<String> {
        self.user_name_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityService for StubIdentityService {
    async fn user_name(&self, user_id: &str) -> Result<Option<String>, AppError> {
        self.user_name_calls
            .lock()
            .unwrap()
            .push(user_id.to_owned());
        Ok(self.user_names.get(user_id).cloned())
    }

    async fn is_in_role(&self, _user_id: &str, _role: &str) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn authorize(&self, user_id: &str, policy_name: &str) -> Result<bool, AppError> {
        self.authorize_calls
            .lock()
            .unwrap()
            .push((user_id.to_owned(), policy_name.to_owned()));
        Ok(self.policies.get(policy_name).copied().unwrap_or(false))
    }

    async fn create_user(
        &self,
        _user_name: &str,
        _password: &str,
    ) -> Result<(IdentityResult, String), AppError> {
        Ok((IdentityResult::failure(["not supported by stub"]), String::new()))
    }

    async fn delete_user(&self, _user_id: &str) -> Result<IdentityResult, AppError> {
        Ok(IdentityResult::failure(["not supported by stub"]))
    }
}
