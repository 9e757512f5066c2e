//! Driving port for role administration use-cases.
//!
//! Inbound adapters (the command line, an admin console) use this port to
//! manage roles without importing the identity store adapter behind it.

use async_trait::async_trait;

use crate::domain::{Error, Role, RoleId};

/// Domain use-case port for creating, listing, and deleting roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRegistry: Send + Sync {
    /// Return every role ordered by name.
    async fn list_roles(&self) -> Result<Vec<Role>, Error>;

    /// Fetch a role by identifier, failing with `NotFound` when absent.
    async fn find_role(&self, id: &RoleId) -> Result<Role, Error>;

    /// Create a role from a raw, caller-supplied name.
    ///
    /// Blank names fail with `InvalidRequest` before the store is consulted;
    /// names already taken fail with `Conflict`.
    async fn create_role(&self, name: &str) -> Result<Role, Error>;

    /// Delete a role, surfacing every reason the store gives for refusing.
    async fn delete_role(&self, id: &RoleId) -> Result<(), Error>;
}
