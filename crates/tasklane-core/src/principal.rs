//! The caller identity for a single request.

/// The authenticated (or anonymous) caller of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    /// User identifier; `None` for anonymous callers.
    pub id: Option<String>,
    /// Role names held by the caller, if any were supplied.
    pub roles: Option<Vec<String>>,
}

impl Principal {
    /// An unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated caller holding `roles`.
    pub fn user<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Some(id.into()),
            roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns `true` when the caller has a user id.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }

    /// Exact, case-sensitive role membership test.
    #[must_use]
    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|held| held == role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_principal_has_no_roles() {
        let principal = Principal::anonymous();

        assert!(!principal.is_authenticated());
        assert!(!principal.is_in_role("Administrator"));
    }

    #[test]
    fn test_role_membership_is_exact() {
        let principal = Principal::user("test-user-id", ["Admin", "User"]);

        assert!(principal.is_authenticated());
        assert!(principal.is_in_role("Admin"));
        assert!(!principal.is_in_role("admin"));
        assert!(!principal.is_in_role(" Admin"));
    }
}
