//! Driving port for editing role membership.

use async_trait::async_trait;

use crate::domain::{Error, ReconciliationRequest, ReconciliationResult, RoleId, RoleMembers};

/// Domain use-case port for viewing and reconciling role membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipReconciler: Send + Sync {
    /// Split every known user into members and non-members of the role.
    async fn role_members(&self, role_id: &RoleId) -> Result<RoleMembers, Error>;

    /// Apply the requested adds and removes, one user at a time.
    ///
    /// Only an unknown role (or a failure to look it up) is returned as
    /// `Err`; per-user failures are reported inside the result.
    async fn reconcile(&self, request: ReconciliationRequest)
    -> Result<ReconciliationResult, Error>;
}
