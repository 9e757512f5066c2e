//! Membership reconciliation domain service.
//!
//! A reconciliation is a batch of independent per-user changes. Each user is
//! resolved, changed, and recorded before the next one starts; a failure is
//! written to the outcome log and the batch carries on. Adds always run as a
//! complete pass before removes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{IdentityStore, MembershipReconciler};
use crate::domain::role_registry_service::{map_store_error, require_role};
use crate::domain::{
    Error, Failure, MembershipAction, OutcomeCollector, ReconciliationRequest,
    ReconciliationResult, Role, RoleId, RoleMembers, UserId,
};

/// Membership service implementing the [`MembershipReconciler`] driving port.
#[derive(Clone)]
pub struct MembershipReconciliationService<S> {
    store: Arc<S>,
}

impl<S> MembershipReconciliationService<S> {
    /// Create a new service over the given identity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> MembershipReconciliationService<S>
where
    S: IdentityStore,
{
    async fn apply(
        &self,
        role: &Role,
        user_id: UserId,
        action: MembershipAction,
        outcomes: &mut OutcomeCollector,
    ) {
        let lookup = self.store.find_user_by_id(&user_id).await;
        let user = match lookup {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(role_id = %role.id(), user_id = %user_id, %action, "user not found");
                outcomes.record_failure(user_id, action, Failure::user_not_found());
                return;
            }
            Err(error) => {
                warn!(
                    role_id = %role.id(),
                    user_id = %user_id,
                    %action,
                    %error,
                    "user lookup failed"
                );
                outcomes.record_failure(user_id, action, error);
                return;
            }
        };

        let result = match action {
            MembershipAction::Add => self.store.add_user_to_role(&user, role.name()).await,
            MembershipAction::Remove => {
                self.store.remove_user_from_role(&user, role.name()).await
            }
        };
        if let Err(error) = &result {
            warn!(
                role_id = %role.id(),
                user_id = %user_id,
                %action,
                %error,
                "membership change rejected"
            );
        }
        outcomes.record(user_id, action, result);
    }
}

#[async_trait]
impl<S> MembershipReconciler for MembershipReconciliationService<S>
where
    S: IdentityStore,
{
    async fn role_members(&self, role_id: &RoleId) -> Result<RoleMembers, Error> {
        let role = require_role(self.store.as_ref(), role_id).await?;
        let users = self
            .store
            .list_users()
            .await
            .map_err(map_store_error("user listing"))?;

        let mut members = Vec::new();
        let mut non_members = Vec::new();
        for user in users {
            let is_member = self
                .store
                .is_user_in_role(&user, role.name())
                .await
                .map_err(map_store_error("membership lookup"))?;
            if is_member {
                members.push(user);
            } else {
                non_members.push(user);
            }
        }

        Ok(RoleMembers {
            role,
            members,
            non_members,
        })
    }

    async fn reconcile(
        &self,
        request: ReconciliationRequest,
    ) -> Result<ReconciliationResult, Error> {
        let role = require_role(self.store.as_ref(), &request.role_id).await?;
        let mut outcomes = OutcomeCollector::with_capacity(request.len());
        let ReconciliationRequest { add, remove, .. } = request;

        for user_id in add {
            self.apply(&role, user_id, MembershipAction::Add, &mut outcomes)
                .await;
        }
        for user_id in remove {
            self.apply(&role, user_id, MembershipAction::Remove, &mut outcomes)
                .await;
        }

        let result = outcomes.finish();
        info!(
            role_id = %role.id(),
            role_name = %role.name(),
            attempted = result.len(),
            failed = result.failed().count(),
            "membership reconciled"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
