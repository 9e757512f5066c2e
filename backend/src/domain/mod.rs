//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed roles, users, and membership outcomes,
//! and the services that validate and apply administrative changes through
//! the identity store port. Types are immutable once validated; document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) - caller-facing error payload.
//! - ErrorCode (alias to `error::ErrorCode`) - stable error identifier.
//! - Role / User - identity snapshots returned by the store.
//! - Failure / OutcomeCollector - per-item failure aggregation.
//! - RoleRegistryService / MembershipReconciliationService - driving port
//!   implementations.
//! - AdminBootstrapper - ensures the administrator account exists.

pub mod error;
pub mod ports;

mod admin_bootstrap;
mod failure;
mod membership;
mod membership_service;
mod role;
mod role_registry_service;
mod user;

pub use self::admin_bootstrap::{
    AdminAccount, AdminBootstrapError, AdminBootstrapper, BootstrapOutcome,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::failure::{Failure, FailureKind, OutcomeCollector, USER_NOT_FOUND};
pub use self::membership::{
    MembershipAction, MembershipOutcome, ReconciliationRequest, ReconciliationResult, RoleMembers,
};
pub use self::membership_service::MembershipReconciliationService;
pub use self::role::{ROLE_NAME_MAX, Role, RoleId, RoleName, RoleValidationError};
pub use self::role_registry_service::RoleRegistryService;
pub use self::user::{NewUser, USER_NAME_MAX, User, UserId, UserName, UserValidationError};

/// Convenient result alias for driving port operations.
///
/// # Examples
/// ```
/// use role_admin::domain::{AdminResult, Error, Role};
///
/// fn lookup() -> AdminResult<Role> {
///     Err(Error::not_found("no role found with id 'r1'"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type AdminResult<T> = Result<T, Error>;
