//! Command-line surface parsed with `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{UserId, UserValidationError};

/// Default location of the identity snapshot.
pub const DEFAULT_STORE_PATH: &str = "identity.json";

/// `role-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "role-admin",
    about = "Manage roles and reconcile role membership in an identity snapshot",
    version
)]
pub struct CliArgs {
    /// Path to the JSON identity snapshot.
    #[arg(long = "store", value_name = "path", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,
    /// Operation to run.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Top-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Create, list, and delete roles.
    #[command(subcommand)]
    Roles(RolesCommand),
    /// Inspect and edit role membership.
    #[command(subcommand)]
    Members(MembersCommand),
    /// Create the configured administrator account if it is missing.
    Bootstrap,
}

/// Role administration operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum RolesCommand {
    /// List every role ordered by name.
    List,
    /// Create a role.
    Create {
        /// Name of the new role.
        name: String,
    },
    /// Delete a role by identifier.
    Delete {
        /// Identifier of the role to delete.
        id: String,
    },
}

/// Membership operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MembersCommand {
    /// Show members and non-members of a role.
    Show {
        /// Identifier of the role.
        role_id: String,
    },
    /// Add and remove users in one pass; adds run before removes.
    ///
    /// User ids must be non-empty and free of surrounding whitespace; a
    /// malformed id is a usage error and nothing is applied. A well-formed
    /// id that names no user is reported as a failed entry while the rest
    /// of the batch proceeds.
    Reconcile {
        /// Identifier of the role.
        role_id: String,
        /// User to add; repeat for several users.
        #[arg(long = "add", value_name = "user-id", value_parser = user_id_arg)]
        add: Vec<UserId>,
        /// User to remove; repeat for several users.
        #[arg(long = "remove", value_name = "user-id", value_parser = user_id_arg)]
        remove: Vec<UserId>,
    },
}

fn user_id_arg(raw: &str) -> Result<UserId, UserValidationError> {
    UserId::new(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use rstest::rstest;

    fn user(id: &str) -> UserId {
        UserId::new(id).expect("valid user id")
    }

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("role-admin").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[rstest]
    fn store_defaults_to_local_snapshot() {
        let args = parse(&["roles", "list"]);
        assert_eq!(args.store, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(args.command, CliCommand::Roles(RolesCommand::List));
    }

    #[rstest]
    fn reconcile_collects_repeated_flags_in_order() {
        let args = parse(&[
            "--store", "/tmp/ids.json", "members", "reconcile", "r1", "--add", "u1", "--remove",
            "u3", "--add", "u2",
        ]);
        assert_eq!(args.store, PathBuf::from("/tmp/ids.json"));
        assert_eq!(
            args.command,
            CliCommand::Members(MembersCommand::Reconcile {
                role_id: "r1".to_owned(),
                add: vec![user("u1"), user("u2")],
                remove: vec![user("u3")],
            })
        );
    }

    #[rstest]
    #[case(&["members", "reconcile", "r1", "--add", " padded"])]
    #[case(&["members", "reconcile", "r1", "--add", "u1", "--remove", ""])]
    fn malformed_user_ids_are_usage_errors(#[case] args: &[&str]) {
        let error =
            CliArgs::try_parse_from(std::iter::once("role-admin").chain(args.iter().copied()))
                .expect_err("malformed user id");
        assert_eq!(error.kind(), ErrorKind::ValueValidation);
        assert_eq!(error.exit_code(), 2);
    }

    #[rstest]
    #[case(&["roles"])]
    #[case(&["roles", "create"])]
    #[case(&["members", "show"])]
    fn incomplete_commands_are_rejected(#[case] args: &[&str]) {
        let parsed =
            CliArgs::try_parse_from(std::iter::once("role-admin").chain(args.iter().copied()));
        assert!(parsed.is_err());
    }
}
