//! Role administration and membership reconciliation.
//!
//! The [`domain`] module holds the role and user model, the driving ports
//! ([`domain::ports::RoleRegistry`], [`domain::ports::MembershipReconciler`])
//! and the services implementing them over an injected
//! [`domain::ports::IdentityStore`]. [`outbound`] bundles an in-memory store
//! with a JSON snapshot file, [`bootstrap`] seeds the administrator account
//! from configuration, and [`inbound`] exposes everything on the command
//! line.

pub mod bootstrap;
pub mod domain;
pub mod inbound;
pub mod outbound;
