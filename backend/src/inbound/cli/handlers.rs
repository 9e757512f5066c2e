//! Command handlers for the role administration command line.
//!
//! Each handler parses raw arguments into domain types, calls one driving
//! port, and renders a line-oriented `key=value` report. Per-user
//! reconciliation failures are part of the report, not an error.

use crate::domain::{
    BootstrapOutcome, FailureKind, MembershipOutcome, ReconciliationRequest, RoleId, User,
};

use super::args::{MembersCommand, RolesCommand};
use super::error::CliError;
use super::state::CliState;

/// Rendered result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    lines: Vec<String>,
    mutated: bool,
}

impl CommandOutput {
    fn read_only(lines: Vec<String>) -> Self {
        Self {
            lines,
            mutated: false,
        }
    }

    fn mutating(lines: Vec<String>) -> Self {
        Self {
            lines,
            mutated: true,
        }
    }

    /// Report lines in print order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the command changed identity state that must be persisted.
    pub fn mutated(&self) -> bool {
        self.mutated
    }

    /// Persist a mutating command with `save`, then hand back the report.
    ///
    /// The report is only released once the change is durable, so a failed
    /// save never prints a confirmation for state that was not written.
    ///
    /// # Errors
    ///
    /// Returns whatever `save` returns; read-only commands never call it.
    pub fn commit<E>(&self, save: impl FnOnce() -> Result<(), E>) -> Result<&[String], E> {
        if self.mutated {
            save()?;
        }
        Ok(self.lines())
    }
}

fn kind_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Validation => "validation",
        FailureKind::NotFound => "not_found",
        FailureKind::Duplicate => "duplicate",
        FailureKind::Store => "store",
        FailureKind::Unavailable => "unavailable",
        FailureKind::Internal => "internal",
    }
}

fn user_line(label: &str, user: &User) -> String {
    format!("{label} id={} name={}", user.id(), user.user_name())
}

fn outcome_line(outcome: &MembershipOutcome) -> String {
    match &outcome.failure {
        None => format!("ok action={} user_id={}", outcome.action, outcome.user_id),
        Some(failure) => format!(
            "failed action={} user_id={} kind={} reason={}",
            outcome.action,
            outcome.user_id,
            kind_label(failure.kind()),
            failure
        ),
    }
}

/// Run a `roles` subcommand.
///
/// # Errors
///
/// Returns [`CliError`] for malformed identifiers and for any domain error
/// the role registry reports.
pub async fn handle_roles(
    state: &CliState,
    command: RolesCommand,
) -> Result<CommandOutput, CliError> {
    match command {
        RolesCommand::List => {
            let roles = state.roles.list_roles().await?;
            let mut lines: Vec<String> = roles
                .iter()
                .map(|role| format!("role id={} name={}", role.id(), role.name()))
                .collect();
            lines.push(format!("count={}", roles.len()));
            Ok(CommandOutput::read_only(lines))
        }
        RolesCommand::Create { name } => {
            let role = state.roles.create_role(&name).await?;
            Ok(CommandOutput::mutating(vec![format!(
                "created id={} name={}",
                role.id(),
                role.name()
            )]))
        }
        RolesCommand::Delete { id } => {
            let id = RoleId::new(id)?;
            state.roles.delete_role(&id).await?;
            Ok(CommandOutput::mutating(vec![format!("deleted id={id}")]))
        }
    }
}

/// Run a `members` subcommand.
///
/// # Errors
///
/// Returns [`CliError`] for a malformed role identifier, an unknown role, or a
/// store failure that prevents the operation from starting.
pub async fn handle_members(
    state: &CliState,
    command: MembersCommand,
) -> Result<CommandOutput, CliError> {
    match command {
        MembersCommand::Show { role_id } => {
            let role_id = RoleId::new(role_id)?;
            let view = state.members.role_members(&role_id).await?;
            let mut lines = vec![format!("role id={} name={}", view.role.id(), view.role.name())];
            lines.extend(view.members.iter().map(|user| user_line("member", user)));
            lines.extend(
                view.non_members
                    .iter()
                    .map(|user| user_line("non_member", user)),
            );
            Ok(CommandOutput::read_only(lines))
        }
        MembersCommand::Reconcile {
            role_id,
            add,
            remove,
        } => {
            let request = ReconciliationRequest::new(RoleId::new(role_id)?, add, remove);
            let result = state.members.reconcile(request).await?;
            let mut lines: Vec<String> = result.outcomes().iter().map(outcome_line).collect();
            let failed = result.failed().count();
            lines.push(format!("attempted={} failed={failed}", result.len()));
            let changed = result.succeeded().next().is_some();
            Ok(CommandOutput {
                lines,
                mutated: changed,
            })
        }
    }
}

/// Render the outcome of the administrator bootstrap.
pub fn render_bootstrap(outcome: &BootstrapOutcome) -> CommandOutput {
    match outcome {
        BootstrapOutcome::Created {
            user,
            role,
            role_created,
        } => CommandOutput::mutating(vec![
            "status=created".to_owned(),
            format!("user_id={}", user.id()),
            format!("user_name={}", user.user_name()),
            format!("role={}", role.name()),
            format!("role_created={role_created}"),
        ]),
        BootstrapOutcome::AlreadyPresent { user } => CommandOutput::read_only(vec![
            "status=already_present".to_owned(),
            format!("user_id={}", user.id()),
        ]),
        BootstrapOutcome::Disabled => {
            CommandOutput::read_only(vec!["status=disabled".to_owned()])
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
