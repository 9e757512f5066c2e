//! Administrator account bootstrap.
//!
//! Ensures a configured administrator exists and belongs to the configured
//! role. Running it again once the account exists changes nothing.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{NewUser, Role, RoleName, User};

/// Account and role the bootstrap should guarantee.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    /// Account to create when no user with its name exists.
    pub account: NewUser,
    /// Role the new account joins, created when absent.
    pub role_name: RoleName,
}

/// What the bootstrap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The account was created and added to the role.
    Created {
        /// Newly created administrator.
        user: User,
        /// Role the administrator joined.
        role: Role,
        /// Whether the role itself had to be created.
        role_created: bool,
    },
    /// A user with the configured name already existed; nothing changed.
    AlreadyPresent {
        /// The existing user.
        user: User,
    },
    /// Bootstrap is switched off; the store was not consulted.
    Disabled,
}

/// Errors raised while bootstrapping the administrator account.
#[derive(Debug, Error)]
pub enum AdminBootstrapError {
    /// The identity store failed or refused one of the bootstrap steps.
    #[error("administrator bootstrap failed during {operation}: {source}")]
    Store {
        /// Step that failed.
        operation: &'static str,
        /// Store error, with every reason the store gave.
        #[source]
        source: IdentityStoreError,
    },
}

impl AdminBootstrapError {
    fn store(operation: &'static str) -> impl FnOnce(IdentityStoreError) -> Self {
        move |source| Self::Store { operation, source }
    }
}

/// Service that creates the administrator account when it is missing.
#[derive(Clone)]
pub struct AdminBootstrapper<S> {
    store: Arc<S>,
}

impl<S> AdminBootstrapper<S> {
    /// Create a new bootstrapper over the given identity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> AdminBootstrapper<S>
where
    S: IdentityStore,
{
    /// Ensure the administrator exists.
    ///
    /// # Errors
    ///
    /// Returns [`AdminBootstrapError`] when any store call fails, including
    /// when the store rejects the account or the role assignment.
    pub async fn ensure_admin(
        &self,
        admin: &AdminAccount,
    ) -> Result<BootstrapOutcome, AdminBootstrapError> {
        let user_name = admin.account.user_name();
        if let Some(user) = self
            .store
            .find_user_by_name(user_name)
            .await
            .map_err(AdminBootstrapError::store("user lookup"))?
        {
            return Ok(BootstrapOutcome::AlreadyPresent { user });
        }

        let (role, role_created) = self.find_or_create_role(&admin.role_name).await?;

        let user = self
            .store
            .create_user(&admin.account)
            .await
            .map_err(AdminBootstrapError::store("user creation"))?;
        self.store
            .add_user_to_role(&user, role.name())
            .await
            .map_err(AdminBootstrapError::store("role assignment"))?;

        info!(
            user_id = %user.id(),
            user_name = %user.user_name(),
            role_name = %role.name(),
            role_created,
            "administrator account created"
        );
        Ok(BootstrapOutcome::Created {
            user,
            role,
            role_created,
        })
    }

    async fn find_or_create_role(
        &self,
        role_name: &RoleName,
    ) -> Result<(Role, bool), AdminBootstrapError> {
        if let Some(role) = self
            .store
            .find_role_by_name(role_name)
            .await
            .map_err(AdminBootstrapError::store("role lookup"))?
        {
            return Ok((role, false));
        }

        match self.store.create_role(role_name).await {
            Ok(role) => Ok((role, true)),
            // Another process created the role between lookup and insert.
            Err(IdentityStoreError::Duplicate { .. }) => self
                .store
                .find_role_by_name(role_name)
                .await
                .map_err(AdminBootstrapError::store("role lookup"))?
                .map(|role| (role, false))
                .ok_or_else(|| AdminBootstrapError::Store {
                    operation: "role creation",
                    source: IdentityStoreError::query(format!(
                        "role '{role_name}' reported as duplicate but not found"
                    )),
                }),
            Err(error) => Err(AdminBootstrapError::store("role creation")(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockIdentityStore, StoreMessages};
    use crate::domain::{RoleId, UserName};
    use rstest::{fixture, rstest};

    #[fixture]
    fn admin() -> AdminAccount {
        AdminAccount {
            account: NewUser::try_new("Admin", Some("admin@example.com".to_owned()), "Secret123$")
                .expect("valid account"),
            role_name: RoleName::new("Admins").expect("valid role"),
        }
    }

    fn admins_role() -> Role {
        Role::new(
            RoleId::new("role-admins").expect("valid id"),
            RoleName::new("Admins").expect("valid name"),
        )
    }

    fn admin_user() -> User {
        User::try_from_strings("user-admin", "Admin")
            .expect("valid user")
            .with_email("admin@example.com")
    }

    #[rstest]
    #[tokio::test]
    async fn existing_user_short_circuits(admin: AdminAccount) {
        let mut store = MockIdentityStore::new();
        store
            .expect_find_user_by_name()
            .withf(|name: &UserName| name.as_ref() == "Admin")
            .return_once(|_| Ok(Some(admin_user())));
        store.expect_find_role_by_name().times(0);
        store.expect_create_user().times(0);
        store.expect_add_user_to_role().times(0);

        let outcome = AdminBootstrapper::new(Arc::new(store))
            .ensure_admin(&admin)
            .await
            .expect("bootstrap");
        assert_eq!(outcome, BootstrapOutcome::AlreadyPresent { user: admin_user() });
    }

    #[rstest]
    #[tokio::test]
    async fn creates_missing_role_then_user_then_membership(admin: AdminAccount) {
        let mut store = MockIdentityStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_find_user_by_name()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(None));
        store
            .expect_find_role_by_name()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(None));
        store
            .expect_create_role()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(admins_role()));
        store
            .expect_create_user()
            .withf(|account: &NewUser| account.password() == "Secret123$")
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(admin_user()));
        store
            .expect_add_user_to_role()
            .withf(|user: &User, role: &RoleName| {
                user.id().as_ref() == "user-admin" && role.as_ref() == "Admins"
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(()));

        let outcome = AdminBootstrapper::new(Arc::new(store))
            .ensure_admin(&admin)
            .await
            .expect("bootstrap");
        assert_eq!(
            outcome,
            BootstrapOutcome::Created {
                user: admin_user(),
                role: admins_role(),
                role_created: true,
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reuses_existing_role(admin: AdminAccount) {
        let mut store = MockIdentityStore::new();
        store.expect_find_user_by_name().return_once(|_| Ok(None));
        store
            .expect_find_role_by_name()
            .return_once(|_| Ok(Some(admins_role())));
        store.expect_create_role().times(0);
        store
            .expect_create_user()
            .return_once(|_| Ok(admin_user()));
        store
            .expect_add_user_to_role()
            .return_once(|_, _| Ok(()));

        let outcome = AdminBootstrapper::new(Arc::new(store))
            .ensure_admin(&admin)
            .await
            .expect("bootstrap");
        assert!(matches!(
            outcome,
            BootstrapOutcome::Created {
                role_created: false,
                ..
            }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_account_reports_every_store_reason(admin: AdminAccount) {
        let mut store = MockIdentityStore::new();
        store.expect_find_user_by_name().return_once(|_| Ok(None));
        store
            .expect_find_role_by_name()
            .return_once(|_| Ok(Some(admins_role())));
        store.expect_create_user().return_once(|_| {
            Err(IdentityStoreError::rejected(StoreMessages::new([
                "Passwords must be at least 12 characters",
                "Passwords must have at least one digit",
            ])))
        });
        store.expect_add_user_to_role().times(0);

        let error = AdminBootstrapper::new(Arc::new(store))
            .ensure_admin(&admin)
            .await
            .expect_err("rejected account");
        let rendered = error.to_string();
        assert!(rendered.contains("user creation"));
        assert!(rendered.contains("at least 12 characters"));
        assert!(rendered.contains("at least one digit"));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_role_creation_falls_back_to_lookup(admin: AdminAccount) {
        let mut store = MockIdentityStore::new();
        let mut lookups = 0;
        store.expect_find_user_by_name().return_once(|_| Ok(None));
        store.expect_find_role_by_name().times(2).returning(move |_| {
            lookups += 1;
            Ok((lookups > 1).then(admins_role))
        });
        store
            .expect_create_role()
            .return_once(|_| Err(IdentityStoreError::duplicate("Admins")));
        store
            .expect_create_user()
            .return_once(|_| Ok(admin_user()));
        store
            .expect_add_user_to_role()
            .return_once(|_, _| Ok(()));

        let outcome = AdminBootstrapper::new(Arc::new(store))
            .ensure_admin(&admin)
            .await
            .expect("bootstrap");
        assert!(matches!(
            outcome,
            BootstrapOutcome::Created {
                role_created: false,
                ..
            }
        ));
    }
}
