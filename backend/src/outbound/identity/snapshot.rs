//! Serialisable snapshot of the bundled identity store.

use serde::{Deserialize, Serialize};

use crate::domain::{Role, RoleId, User, UserId};

/// Stored user record: the public snapshot plus the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    /// Public user snapshot.
    pub user: User,
    /// Salted password hash, absent for accounts imported without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// One membership edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    /// Member user.
    pub user_id: UserId,
    /// Role the user belongs to.
    pub role_id: RoleId,
}

/// Full contents of an identity store, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    /// Roles in creation order.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Users in creation order.
    #[serde(default)]
    pub users: Vec<StoredUser>,
    /// Membership edges, sorted.
    #[serde(default)]
    pub memberships: Vec<MembershipRecord>,
}
