//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_store;
mod membership_reconciler;
mod role_registry;

#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError, StoreMessages};
#[cfg(test)]
pub use membership_reconciler::MockMembershipReconciler;
pub use membership_reconciler::MembershipReconciler;
#[cfg(test)]
pub use role_registry::MockRoleRegistry;
pub use role_registry::RoleRegistry;
