//! Role registry domain service.
//!
//! Thin validation layer over the identity store: names are checked before
//! the store is consulted, duplicates and unknown ids are reported as domain
//! errors, and store rejections keep every reason the store supplied.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IdentityStore, IdentityStoreError, RoleRegistry};
use crate::domain::{Error, Failure, Role, RoleId, RoleName};

pub(crate) fn map_store_error(operation: &str) -> impl FnOnce(IdentityStoreError) -> Error + '_ {
    move |error| Failure::from(error).into_error(operation)
}

/// Resolve a role id, failing with `NotFound` when the store has no match.
pub(crate) async fn require_role<S>(store: &S, id: &RoleId) -> Result<Role, Error>
where
    S: IdentityStore + ?Sized,
{
    store
        .find_role_by_id(id)
        .await
        .map_err(map_store_error("role lookup"))?
        .ok_or_else(|| Error::not_found(format!("no role found with id '{id}'")))
}

/// Role registry service implementing the [`RoleRegistry`] driving port.
#[derive(Clone)]
pub struct RoleRegistryService<S> {
    store: Arc<S>,
}

impl<S> RoleRegistryService<S> {
    /// Create a new service over the given identity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> RoleRegistry for RoleRegistryService<S>
where
    S: IdentityStore,
{
    async fn list_roles(&self) -> Result<Vec<Role>, Error> {
        let mut roles = self
            .store
            .list_roles()
            .await
            .map_err(map_store_error("role listing"))?;
        roles.sort_by(Role::cmp_by_name);
        Ok(roles)
    }

    async fn find_role(&self, id: &RoleId) -> Result<Role, Error> {
        require_role(self.store.as_ref(), id).await
    }

    async fn create_role(&self, name: &str) -> Result<Role, Error> {
        let name = RoleName::new(name).map_err(|err| Error::invalid_request(err.to_string()))?;

        let existing = self
            .store
            .find_role_by_name(&name)
            .await
            .map_err(map_store_error("role lookup"))?;
        if existing.is_some() {
            return Err(Error::conflict(format!("role '{name}' already exists")));
        }

        let role = self
            .store
            .create_role(&name)
            .await
            .map_err(map_store_error("role creation"))?;
        info!(role_id = %role.id(), role_name = %role.name(), "role created");
        Ok(role)
    }

    async fn delete_role(&self, id: &RoleId) -> Result<(), Error> {
        let role = require_role(self.store.as_ref(), id).await?;
        self.store
            .delete_role(&role)
            .await
            .map_err(map_store_error("role deletion"))?;
        info!(role_id = %role.id(), role_name = %role.name(), "role deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "role_registry_service_tests.rs"]
mod tests;
