//! Command-line inbound adapter.
//!
//! Parses `role-admin` arguments, runs them against the driving ports held
//! in [`CliState`], and renders line-oriented reports. The binary owns the
//! snapshot file and persists through [`CommandOutput::commit`] before
//! printing.

pub mod args;
pub mod error;
pub mod handlers;
pub mod state;

pub use args::{CliArgs, CliCommand, MembersCommand, RolesCommand};
pub use error::CliError;
pub use handlers::{CommandOutput, handle_members, handle_roles, render_bootstrap};
pub use state::CliState;
