//! Caller identity extraction.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use tasklane_core::principal::Principal;
use tasklane_mediator::RequestContext;

use crate::state::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's roles, comma separated.
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// The request context for the calling user.
///
/// Built from `x-user-id` and `x-user-roles`. A missing or blank user id
/// yields an anonymous caller. The request is cancelled when the server
/// begins shutting down.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Reads the caller's principal from request headers.
#[must_use]
pub fn principal_from_headers(headers: &HeaderMap) -> Principal {
    let Some(user_id) = header(headers, USER_ID_HEADER) else {
        return Principal::anonymous();
    };
    let roles = header(headers, USER_ROLES_HEADER)
        .map(|roles| {
            roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Principal::user(user_id, roles)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let context = RequestContext::new(principal_from_headers(&parts.headers))
            .with_cancellation(state.shutdown.child());
        Ok(Self(context))
    }
}
