//! Default users and roles.

use tasklane_core::error::AppError;
use tasklane_core::identity::IdentityService;
use tracing::{info, warn};

use crate::service::{ADMINISTRATOR_ROLE, InMemoryIdentityService};

pub const DEFAULT_ADMIN_USER_NAME: &str = "administrator@localhost";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Administrator1!";

/// Ensures the `Administrator` role exists and that
/// `administrator@localhost` exists and holds it. Safe to run repeatedly.
///
/// # Errors
///
/// Returns `AppError::Unexpected` when the administrator cannot be created.
pub async fn seed_defaults(identity: &InMemoryIdentityService) -> Result<(), AppError> {
    if !identity.role_exists(ADMINISTRATOR_ROLE)? {
        identity.create_role(ADMINISTRATOR_ROLE)?;
    }

    let user_id = match identity.find_user_id(DEFAULT_ADMIN_USER_NAME)? {
        Some(user_id) => user_id,
        None => {
            let (result, user_id) = identity
                .create_user(DEFAULT_ADMIN_USER_NAME, DEFAULT_ADMIN_PASSWORD)
                .await?;
            if !result.succeeded {
                return Err(AppError::Unexpected(format!(
                    "failed to seed administrator: {}",
                    result.errors.join("; ")
                )));
            }
            user_id
        }
    };

    if !identity.is_in_role(&user_id, ADMINISTRATOR_ROLE).await? {
        let result = identity.add_to_role(&user_id, ADMINISTRATOR_ROLE)?;
        if !result.succeeded {
            warn!(errors = ?result.errors, "could not grant administrator role");
        }
    }

    info!(user_name = DEFAULT_ADMIN_USER_NAME, "identity defaults seeded");
    Ok(())
}
