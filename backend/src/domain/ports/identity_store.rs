//! Driven port for the identity store that owns users, roles, and membership.
//!
//! The administration core never persists anything itself. Adapters wrap a
//! concrete store (an embedded map, a snapshot file, a directory service) and
//! report each operation's outcome through [`IdentityStoreError`].

use std::fmt;

use async_trait::async_trait;

use crate::domain::{NewUser, Role, RoleId, RoleName, User, UserId, UserName};

use super::define_port_error;

/// Ordered, domain-specific reasons an identity store gave for refusing an
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreMessages(Vec<String>);

impl StoreMessages {
    /// Wrap the store's reasons, keeping their order.
    pub fn new<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self(messages.into_iter().map(Into::into).collect())
    }

    /// Borrow the reasons in reported order.
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Take ownership of the reasons.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for StoreMessages {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for StoreMessages {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl fmt::Display for StoreMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "identity store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity store query failed: {message}",
        /// A role or user with the same normalised name already exists.
        Duplicate { name: String } => "name '{name}' is already taken",
        /// The store refused the operation for one or more domain reasons.
        Rejected { messages: StoreMessages } => "identity store rejected the operation: {messages}",
    }
}

/// Port for the external system of record for users, roles, and membership.
///
/// Membership edges have set semantics: adding an existing edge or removing
/// a missing one succeeds without changing state. Name lookups compare the
/// normalised (upper-cased) form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch a role by identifier.
    async fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, IdentityStoreError>;

    /// Fetch a role by name.
    async fn find_role_by_name(&self, name: &RoleName)
    -> Result<Option<Role>, IdentityStoreError>;

    /// Return every role in the store, in no particular order.
    async fn list_roles(&self) -> Result<Vec<Role>, IdentityStoreError>;

    /// Create a role and return it with its assigned identifier.
    async fn create_role(&self, name: &RoleName) -> Result<Role, IdentityStoreError>;

    /// Delete a role. The store removes the role's membership edges.
    async fn delete_role(&self, role: &Role) -> Result<(), IdentityStoreError>;

    /// Fetch a user by identifier.
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityStoreError>;

    /// Fetch a user by login name.
    async fn find_user_by_name(&self, name: &UserName)
    -> Result<Option<User>, IdentityStoreError>;

    /// Create a user account. Password hashing and policy are the store's
    /// concern.
    async fn create_user(&self, account: &NewUser) -> Result<User, IdentityStoreError>;

    /// Return every user in the store, in the store's listing order.
    async fn list_users(&self) -> Result<Vec<User>, IdentityStoreError>;

    /// Report whether the user currently belongs to the named role.
    async fn is_user_in_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<bool, IdentityStoreError>;

    /// Add the user to the named role.
    async fn add_user_to_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<(), IdentityStoreError>;

    /// Remove the user from the named role.
    async fn remove_user_from_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<(), IdentityStoreError>;
}
