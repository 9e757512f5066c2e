//! Administrator account configuration loaded via OrthoConfig.

use std::fmt;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_ROLE: &str = "Admins";

/// Configuration values describing the administrator account to bootstrap.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN_USER")]
pub struct AdminAccountSettings {
    /// Create the administrator when it is missing.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Login name of the administrator.
    pub name: Option<String>,
    /// Contact email recorded on the account.
    pub email: Option<String>,
    /// Initial password handed to the identity store.
    pub password: Option<String>,
    /// Role the administrator joins.
    pub role: Option<String>,
}

impl AdminAccountSettings {
    /// Whether the bootstrap should run.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the configured role name, falling back to the default.
    pub fn role_name(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }
}

impl fmt::Debug for AdminAccountSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccountSettings")
            .field("enabled", &self.enabled)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}
