//! Shared command-line adapter state.
//!
//! Handlers accept this state so they only depend on domain ports and stay
//! testable without touching a snapshot file.

use std::sync::Arc;

use crate::domain::ports::{MembershipReconciler, RoleRegistry};

/// Dependency bundle for command handlers.
#[derive(Clone)]
pub struct CliState {
    pub roles: Arc<dyn RoleRegistry>,
    pub members: Arc<dyn MembershipReconciler>,
}

impl CliState {
    /// Bundle the driving ports used by the command handlers.
    pub fn new(roles: Arc<dyn RoleRegistry>, members: Arc<dyn MembershipReconciler>) -> Self {
        Self { roles, members }
    }
}
