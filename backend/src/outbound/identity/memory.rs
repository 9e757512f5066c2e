//! In-memory identity store adapter.
//!
//! State sits behind one `RwLock` taken for the duration of a single port
//! call. Names are compared in their normalised (upper-case) form while the
//! caller's casing is stored and returned. Membership edges form a set.

use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{NewUser, Role, RoleId, RoleName, User, UserId, UserName};

use super::password::{PasswordPolicy, hash_password};
use super::snapshot::{IdentitySnapshot, MembershipRecord, StoredUser};

#[derive(Debug, Default)]
struct IdentityState {
    roles: Vec<Role>,
    users: Vec<StoredUser>,
    memberships: BTreeSet<(UserId, RoleId)>,
}

impl IdentityState {
    fn role_by_name(&self, name: &RoleName) -> Option<&Role> {
        let key = name.normalized();
        self.roles
            .iter()
            .find(|role| role.name().normalized() == key)
    }

    fn user_by_name(&self, name: &UserName) -> Option<&StoredUser> {
        let key = name.normalized();
        self.users
            .iter()
            .find(|stored| stored.user.user_name().normalized() == key)
    }

    fn contains_user(&self, id: &UserId) -> bool {
        self.users.iter().any(|stored| stored.user.id() == id)
    }

    /// Resolve the edge a membership call refers to.
    fn edge(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<(UserId, RoleId), IdentityStoreError> {
        let role = self.role_by_name(role_name).ok_or_else(|| {
            IdentityStoreError::rejected(format!("role '{role_name}' does not exist").as_str())
        })?;
        if !self.contains_user(user.id()) {
            return Err(IdentityStoreError::rejected(
                format!("user '{}' does not exist", user.id()).as_str(),
            ));
        }
        Ok((user.id().clone(), role.id().clone()))
    }
}

/// Identity store holding every role, user, and edge in process memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    state: RwLock<IdentityState>,
    policy: PasswordPolicy,
}

impl InMemoryIdentityStore {
    /// Create an empty store with the default password policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the password policy applied by [`IdentityStore::create_user`].
    #[must_use]
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rebuild a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Duplicate`] when two roles or two users
    /// share a normalised name, and [`IdentityStoreError::Query`] when an
    /// edge references an unknown user or role.
    pub fn from_snapshot(snapshot: IdentitySnapshot) -> Result<Self, IdentityStoreError> {
        let IdentitySnapshot {
            roles,
            users,
            memberships,
        } = snapshot;

        let mut state = IdentityState::default();
        for role in roles {
            if state.role_by_name(role.name()).is_some() {
                return Err(IdentityStoreError::duplicate(role.name().as_ref()));
            }
            state.roles.push(role);
        }
        for stored in users {
            if state.user_by_name(stored.user.user_name()).is_some() {
                return Err(IdentityStoreError::duplicate(stored.user.user_name().as_ref()));
            }
            state.users.push(stored);
        }
        for MembershipRecord { user_id, role_id } in memberships {
            let role_known = state.roles.iter().any(|role| role.id() == &role_id);
            if !role_known || !state.contains_user(&user_id) {
                return Err(IdentityStoreError::query(format!(
                    "membership ({user_id}, {role_id}) references an unknown user or role"
                )));
            }
            state.memberships.insert((user_id, role_id));
        }

        Ok(Self {
            state: RwLock::new(state),
            policy: PasswordPolicy::default(),
        })
    }

    /// Capture the current state.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Connection`] when the state lock is
    /// poisoned.
    pub fn snapshot(&self) -> Result<IdentitySnapshot, IdentityStoreError> {
        let state = self.read()?;
        Ok(IdentitySnapshot {
            roles: state.roles.clone(),
            users: state.users.clone(),
            memberships: state
                .memberships
                .iter()
                .map(|(user_id, role_id)| MembershipRecord {
                    user_id: user_id.clone(),
                    role_id: role_id.clone(),
                })
                .collect(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IdentityState>, IdentityStoreError> {
        self.state
            .read()
            .map_err(|_| IdentityStoreError::connection("identity store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IdentityState>, IdentityStoreError> {
        self.state
            .write()
            .map_err(|_| IdentityStoreError::connection("identity store lock poisoned"))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, IdentityStoreError> {
        let state = self.read()?;
        Ok(state.roles.iter().find(|role| role.id() == id).cloned())
    }

    async fn find_role_by_name(
        &self,
        name: &RoleName,
    ) -> Result<Option<Role>, IdentityStoreError> {
        Ok(self.read()?.role_by_name(name).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, IdentityStoreError> {
        Ok(self.read()?.roles.clone())
    }

    async fn create_role(&self, name: &RoleName) -> Result<Role, IdentityStoreError> {
        let mut state = self.write()?;
        if state.role_by_name(name).is_some() {
            return Err(IdentityStoreError::duplicate(name.as_ref()));
        }
        let role = Role::new(RoleId::random(), name.clone());
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role: &Role) -> Result<(), IdentityStoreError> {
        let mut state = self.write()?;
        let Some(index) = state.roles.iter().position(|r| r.id() == role.id()) else {
            return Err(IdentityStoreError::rejected(
                format!("role '{}' does not exist", role.id()).as_str(),
            ));
        };
        state.roles.remove(index);
        let before = state.memberships.len();
        state.memberships.retain(|(_, role_id)| role_id != role.id());
        debug!(
            role_id = %role.id(),
            edges_removed = before - state.memberships.len(),
            "role memberships cascaded"
        );
        Ok(())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityStoreError> {
        let state = self.read()?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_user_by_name(
        &self,
        name: &UserName,
    ) -> Result<Option<User>, IdentityStoreError> {
        Ok(self.read()?.user_by_name(name).map(|stored| stored.user.clone()))
    }

    async fn create_user(&self, account: &NewUser) -> Result<User, IdentityStoreError> {
        let violations = self.policy.violations(account.password());
        if !violations.is_empty() {
            return Err(IdentityStoreError::rejected(violations));
        }

        let password_hash = hash_password(account.password())
            .map_err(|err| IdentityStoreError::query(format!("password hashing failed: {err}")))?;

        let mut state = self.write()?;
        if state.user_by_name(account.user_name()).is_some() {
            return Err(IdentityStoreError::duplicate(account.user_name().as_ref()));
        }
        let id = UserId::random();
        let user = User::new(id, account.user_name().clone());
        let user = match account.email() {
            Some(email) => user.with_email(email),
            None => user,
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: Some(password_hash),
        });
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, IdentityStoreError> {
        let state = self.read()?;
        Ok(state.users.iter().map(|stored| stored.user.clone()).collect())
    }

    async fn is_user_in_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<bool, IdentityStoreError> {
        let state = self.read()?;
        let Some(role) = state.role_by_name(role_name) else {
            return Ok(false);
        };
        Ok(state
            .memberships
            .contains(&(user.id().clone(), role.id().clone())))
    }

    async fn add_user_to_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<(), IdentityStoreError> {
        let mut state = self.write()?;
        let edge = state.edge(user, role_name)?;
        state.memberships.insert(edge);
        Ok(())
    }

    async fn remove_user_from_role(
        &self,
        user: &User,
        role_name: &RoleName,
    ) -> Result<(), IdentityStoreError> {
        let mut state = self.write()?;
        let edge = state.edge(user, role_name)?;
        state.memberships.remove(&edge);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
