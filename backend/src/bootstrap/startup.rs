//! Startup administrator bootstrap orchestration.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::bootstrap::config::AdminAccountSettings;
use crate::domain::ports::IdentityStore;
use crate::domain::{
    AdminAccount, AdminBootstrapError, AdminBootstrapper, BootstrapOutcome, NewUser, RoleName,
    RoleValidationError, UserValidationError,
};

/// Errors returned while bootstrapping the administrator on startup.
#[derive(Debug, Error)]
pub enum StartupBootstrapError {
    /// Bootstrap is enabled but no account name is configured.
    #[error("administrator name must be configured (ADMIN_USER_NAME)")]
    MissingName,
    /// Bootstrap is enabled but no password is configured.
    #[error("administrator password must be configured (ADMIN_USER_PASSWORD)")]
    MissingPassword,
    /// The configured account details are invalid.
    #[error("invalid administrator account: {0}")]
    InvalidAccount(#[from] UserValidationError),
    /// The configured role name is invalid.
    #[error("invalid administrator role: {0}")]
    InvalidRole(#[from] RoleValidationError),
    /// The identity store failed or refused a bootstrap step.
    #[error(transparent)]
    Bootstrap(#[from] AdminBootstrapError),
}

fn admin_account(settings: &AdminAccountSettings) -> Result<AdminAccount, StartupBootstrapError> {
    let name = settings
        .name
        .as_deref()
        .ok_or(StartupBootstrapError::MissingName)?;
    let password = settings
        .password
        .as_deref()
        .ok_or(StartupBootstrapError::MissingPassword)?;
    Ok(AdminAccount {
        account: NewUser::try_new(name, settings.email.clone(), password)?,
        role_name: RoleName::new(settings.role_name())?,
    })
}

/// Ensure the configured administrator exists when bootstrap is enabled.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use role_admin::bootstrap::{AdminAccountSettings, bootstrap_admin_on_startup};
/// use role_admin::domain::BootstrapOutcome;
/// use role_admin::outbound::identity::InMemoryIdentityStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = AdminAccountSettings {
///     enabled: false,
///     name: Some("admin".to_string()),
///     email: None,
///     password: None,
///     role: None,
/// };
/// let store = Arc::new(InMemoryIdentityStore::new());
/// let outcome = bootstrap_admin_on_startup(&settings, store).await?;
/// assert_eq!(outcome, BootstrapOutcome::Disabled);
/// # Ok(())
/// # }
/// ```
pub async fn bootstrap_admin_on_startup<S>(
    settings: &AdminAccountSettings,
    store: Arc<S>,
) -> Result<BootstrapOutcome, StartupBootstrapError>
where
    S: IdentityStore,
{
    if !settings.is_enabled() {
        debug!(reason = "disabled", "administrator bootstrap skipped");
        return Ok(BootstrapOutcome::Disabled);
    }

    let admin = admin_account(settings)?;
    let outcome = AdminBootstrapper::new(store).ensure_admin(&admin).await?;

    if let BootstrapOutcome::AlreadyPresent { user } = &outcome {
        info!(
            user_id = %user.id(),
            user_name = %user.user_name(),
            "administrator already present; skipping"
        );
    }
    Ok(outcome)
}
