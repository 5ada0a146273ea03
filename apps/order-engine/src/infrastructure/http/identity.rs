//! Caller identity extraction.
//!
//! Authentication happens upstream. The gateway forwards the verified
//! identity as `x-user-id` and `x-user-role` (`admin` or `customer`).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::order_management::{Requester, Role};
use crate::domain::shared::UserId;
use crate::error::ApiError;

/// Header carrying the verified user ID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller role. Absent means customer.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Verified requester extracted from request headers.
#[derive(Debug, Clone)]
pub struct Identity(pub Requester);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_role(raw: Option<&str>) -> Result<Role, ApiError> {
    match raw {
        None => Ok(Role::Customer),
        Some(r) if r.eq_ignore_ascii_case("customer") => Ok(Role::Customer),
        Some(r) if r.eq_ignore_ascii_case("admin") => Ok(Role::Admin),
        Some(other) => Err(ApiError::unauthenticated(format!("unknown role '{other}'"))),
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthenticated("missing x-user-id header"))?;
        let role = parse_role(header(parts, USER_ROLE_HEADER))?;
        Ok(Self(Requester {
            user_id: UserId::new(user_id),
            role,
        }))
    }
}
