//! Membership reconciliation requests, outcomes, and views.

use std::fmt;

use serde::Serialize;

use crate::domain::{Failure, Role, RoleId, User, UserId};

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipAction {
    /// Put the user into the role.
    Add,
    /// Take the user out of the role.
    Remove,
}

impl fmt::Display for MembershipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Desired membership changes for one role.
///
/// Both lists are processed in order and duplicates are kept: every entry
/// produces its own outcome. All adds run before any remove, so an id listed
/// in both ends up outside the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRequest {
    /// Role whose membership is being edited.
    pub role_id: RoleId,
    /// Users to put into the role.
    pub add: Vec<UserId>,
    /// Users to take out of the role.
    pub remove: Vec<UserId>,
}

impl ReconciliationRequest {
    /// Build a request from the role and both id lists.
    pub fn new(role_id: RoleId, add: Vec<UserId>, remove: Vec<UserId>) -> Self {
        Self {
            role_id,
            add,
            remove,
        }
    }

    /// Total number of membership changes requested.
    pub fn len(&self) -> usize {
        self.add.len() + self.remove.len()
    }

    /// Whether the request asks for no changes at all.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Result of one attempted membership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipOutcome {
    /// User the change targeted, as submitted.
    pub user_id: UserId,
    /// Whether the change was an add or a remove.
    pub action: MembershipAction,
    /// Why the change failed; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl MembershipOutcome {
    /// Whether the change was applied.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Every outcome of a reconciliation, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReconciliationResult {
    outcomes: Vec<MembershipOutcome>,
}

impl ReconciliationResult {
    /// Wrap outcomes recorded in processing order.
    pub fn new(outcomes: Vec<MembershipOutcome>) -> Self {
        Self { outcomes }
    }

    /// All outcomes, adds first then removes.
    pub fn outcomes(&self) -> &[MembershipOutcome] {
        self.outcomes.as_slice()
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no changes were attempted.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes whose change was applied.
    pub fn succeeded(&self) -> impl Iterator<Item = &MembershipOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.succeeded())
    }

    /// Outcomes whose change failed.
    pub fn failed(&self) -> impl Iterator<Item = &MembershipOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    /// Whether any change failed.
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Take ownership of the outcomes.
    pub fn into_outcomes(self) -> Vec<MembershipOutcome> {
        self.outcomes
    }
}

/// A role together with every known user split by membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMembers {
    /// The role being viewed.
    pub role: Role,
    /// Users currently in the role.
    pub members: Vec<User>,
    /// Users currently outside the role.
    pub non_members: Vec<User>,
}
