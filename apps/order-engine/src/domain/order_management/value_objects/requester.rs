//! Verified caller identity supplied by the identity collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::shared::UserId;

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular storefront customer.
    Customer,
    /// Store administrator.
    Admin,
}

/// Who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Verified user ID.
    pub user_id: UserId,
    /// Role.
    pub role: Role,
}

impl Requester {
    /// A customer.
    #[must_use]
    pub fn customer(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Customer,
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    /// Returns true for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this requester may see an order owned by `owner`.
    #[must_use]
    pub fn can_see(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user_id == owner
    }

    /// Owner filter for list queries; `None` means unrestricted.
    #[must_use]
    pub fn visibility_scope(&self) -> Option<&UserId> {
        if self.is_admin() {
            None
        } else {
            Some(&self.user_id)
        }
    }
}
