//! In-memory identity service.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tasklane_core::error::AppError;
use tasklane_core::identity::{IdentityResult, IdentityService};
use tracing::{debug, info};
use uuid::Uuid;

use crate::password;

/// Role granted to the seeded administrator.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Policy satisfied by members of [`ADMINISTRATOR_ROLE`].
pub const CAN_PURGE_POLICY: &str = "CanPurge";

#[derive(Debug)]
struct User {
    id: String,
    user_name: String,
    salt: String,
    password_hash: String,
    roles: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Directory {
    users: HashMap<String, User>,
    roles: BTreeSet<String>,
}

impl Directory {
    fn user_by_name(&self, user_name: &str) -> Option<&User> {
        self.users
            .values()
            .find(|user| user.user_name.eq_ignore_ascii_case(user_name))
    }
}

/// Users, roles and policies held in process memory.
///
/// A policy names the roles that satisfy it; a user passes the policy when
/// they hold at least one of them.
#[derive(Debug)]
pub struct InMemoryIdentityService {
    directory: RwLock<Directory>,
    policies: HashMap<String, Vec<String>>,
}

impl Default for InMemoryIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityService {
    /// An empty directory with the `CanPurge` policy registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            policies: HashMap::new(),
        }
        .with_policy(CAN_PURGE_POLICY, &[ADMINISTRATOR_ROLE])
    }

    /// Registers (or replaces) a policy satisfied by any of `roles`.
    #[must_use]
    pub fn with_policy(mut self, policy: &str, roles: &[&str]) -> Self {
        self.policies.insert(
            policy.to_owned(),
            roles.iter().map(|role| (*role).to_owned()).collect(),
        );
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Directory>, AppError> {
        self.directory
            .read()
            .map_err(|_| AppError::Unexpected("identity directory lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Directory>, AppError> {
        self.directory
            .write()
            .map_err(|_| AppError::Unexpected("identity directory lock poisoned".into()))
    }

    /// Creates a role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the directory lock is poisoned.
    pub fn create_role(&self, name: &str) -> Result<IdentityResult, AppError> {
        let mut directory = self.write()?;
        if name.trim().is_empty() {
            return Ok(IdentityResult::failure(["Role name is required."]));
        }
        if !directory.roles.insert(name.to_owned()) {
            return Ok(IdentityResult::failure([format!(
                "Role name '{name}' is already taken."
            )]));
        }
        info!(role = name, "role created");
        Ok(IdentityResult::success())
    }

    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the directory lock is poisoned.
    pub fn role_exists(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.read()?.roles.contains(name))
    }

    /// Looks up a user id by user name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the directory lock is poisoned.
    pub fn find_user_id(&self, user_name: &str) -> Result<Option<String>, AppError> {
        Ok(self.read()?.user_by_name(user_name).map(|user| user.id.clone()))
    }

    /// Adds an existing user to an existing role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the directory lock is poisoned.
    pub fn add_to_role(&self, user_id: &str, role: &str) -> Result<IdentityResult, AppError> {
        let mut directory = self.write()?;
        if !directory.roles.contains(role) {
            return Ok(IdentityResult::failure([format!("Role {role} does not exist.")]));
        }
        let Some(user) = directory.users.get_mut(user_id) else {
            return Ok(IdentityResult::failure(["User not found."]));
        };
        if !user.roles.insert(role.to_owned()) {
            return Ok(IdentityResult::failure([format!(
                "User already in role '{role}'."
            )]));
        }
        info!(user_id, role, "user added to role");
        Ok(IdentityResult::success())
    }

    /// Returns `true` when `password` matches the user's stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unexpected` if the directory lock is poisoned.
    pub fn check_password(&self, user_id: &str, password: &str) -> Result<bool, AppError> {
        Ok(self
            .read()?
            .users
            .get(user_id)
            .is_some_and(|user| password::hash(&user.salt, password) == user.password_hash))
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentityService {
    async fn user_name(&self, user_id: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .read()?
            .users
            .get(user_id)
            .map(|user| user.user_name.clone()))
    }

    async fn is_in_role(&self, user_id: &str, role: &str) -> Result<bool, AppError> {
        Ok(self
            .read()?
            .users
            .get(user_id)
            .is_some_and(|user| user.roles.contains(role)))
    }

    async fn authorize(&self, user_id: &str, policy_name: &str) -> Result<bool, AppError> {
        let Some(roles) = self.policies.get(policy_name) else {
            return Err(AppError::Unexpected(format!(
                "no authorization policy named '{policy_name}'"
            )));
        };
        let directory = self.read()?;
        let allowed = directory
            .users
            .get(user_id)
            .is_some_and(|user| roles.iter().any(|role| user.roles.contains(role)));
        debug!(user_id, policy = policy_name, allowed, "policy evaluated");
        Ok(allowed)
    }

    async fn create_user(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<(IdentityResult, String), AppError> {
        let mut errors = Vec::new();
        if user_name.trim().is_empty() {
            errors.push("User name is required.".to_owned());
        }
        errors.extend(password::validate(password));

        let mut directory = self.write()?;
        if directory.user_by_name(user_name).is_some() {
            errors.push(format!("Username '{user_name}' is already taken."));
        }
        if !errors.is_empty() {
            return Ok((IdentityResult::failure(errors), String::new()));
        }

        let id = Uuid::new_v4().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = password::hash(&salt, password);
        directory.users.insert(
            id.clone(),
            User {
                id: id.clone(),
                user_name: user_name.to_owned(),
                salt,
                password_hash,
                roles: BTreeSet::new(),
            },
        );
        info!(user_id = %id, user_name, "user created");
        Ok((IdentityResult::success(), id))
    }

    async fn delete_user(&self, user_id: &str) -> Result<IdentityResult, AppError> {
        if self.write()?.users.remove(user_id).is_some() {
            info!(user_id, "user deleted");
        }
        Ok(IdentityResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "Secret1!";

    async fn user_in_roles(identity: &InMemoryIdentityService, name: &str, roles: &[&str]) -> String {
        let (result, id) = identity.create_user(name, PASSWORD).await.unwrap();
        assert!(result.succeeded, "{:?}", result.errors);
        for role in roles {
            let _ = identity.create_role(role).unwrap();
            assert!(identity.add_to_role(&id, role).unwrap().succeeded);
        }
        id
    }

    #[tokio::test]
    async fn test_create_user_returns_id_and_stores_name() {
        // Arrange
        let identity = InMemoryIdentityService::new();

        // Act
        let (result, id) = identity.create_user("alice@localhost", PASSWORD).await.unwrap();

        // Assert
        assert!(result.succeeded);
        assert!(!id.is_empty());
        assert_eq!(
            identity.user_name(&id).await.unwrap().as_deref(),
            Some("alice@localhost")
        );
        assert!(identity.check_password(&id, PASSWORD).unwrap());
        assert!(!identity.check_password(&id, "Wrong1!").unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_is_rejected() {
        let identity = InMemoryIdentityService::new();
        user_in_roles(&identity, "alice@localhost", &[]).await;

        let (result, id) = identity.create_user("ALICE@localhost", PASSWORD).await.unwrap();

        assert!(!result.succeeded);
        assert!(id.is_empty());
        assert_eq!(result.errors, vec!["Username 'ALICE@localhost' is already taken."]);
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected() {
        let identity = InMemoryIdentityService::new();

        let (result, _) = identity.create_user("bob@localhost", "password").await.unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(identity.find_user_id("bob@localhost").unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_name_and_no_roles() {
        let identity = InMemoryIdentityService::new();

        assert_eq!(identity.user_name("missing").await.unwrap(), None);
        assert!(!identity.is_in_role("missing", ADMINISTRATOR_ROLE).await.unwrap());
    }

    #[tokio::test]
    async fn test_can_purge_passes_only_for_administrators() {
        // Arrange
        let identity = InMemoryIdentityService::new();
        let admin = user_in_roles(&identity, "admin@localhost", &[ADMINISTRATOR_ROLE]).await;
        let user = user_in_roles(&identity, "user@localhost", &[]).await;

        // Act
        let admin_allowed = identity.authorize(&admin, CAN_PURGE_POLICY).await.unwrap();
        let user_allowed = identity.authorize(&user, CAN_PURGE_POLICY).await.unwrap();

        // Assert
        assert!(admin_allowed);
        assert!(!user_allowed);
        assert!(identity.is_in_role(&admin, ADMINISTRATOR_ROLE).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_policy_is_an_error() {
        let identity = InMemoryIdentityService::new();

        let result = identity.authorize("anyone", "CanFly").await;

        assert!(matches!(result, Err(AppError::Unexpected(message)) if message.contains("CanFly")));
    }

    #[tokio::test]
    async fn test_custom_policy_accepts_any_listed_role() {
        let identity = InMemoryIdentityService::new().with_policy("CanEdit", &["Editor", "Owner"]);
        let owner = user_in_roles(&identity, "owner@localhost", &["Owner"]).await;

        assert!(identity.authorize(&owner, "CanEdit").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_to_missing_role_fails() {
        let identity = InMemoryIdentityService::new();
        let id = user_in_roles(&identity, "carol@localhost", &[]).await;

        let result = identity.add_to_role(&id, "Ghost").unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.errors, vec!["Role Ghost does not exist."]);
    }

    #[tokio::test]
    async fn test_delete_user_removes_user_and_ignores_unknown_ids() {
        // Arrange
        let identity = InMemoryIdentityService::new();
        let id = user_in_roles(&identity, "dave@localhost", &[]).await;

        // Act
        let deleted = identity.delete_user(&id).await.unwrap();
        let missing = identity.delete_user("missing").await.unwrap();

        // Assert
        assert!(deleted.succeeded);
        assert!(missing.succeeded);
        assert_eq!(identity.user_name(&id).await.unwrap(), None);
    }
}
