//! Startup wiring for the administrator account bootstrap.

mod config;
mod startup;

pub use config::AdminAccountSettings;
pub use startup::{StartupBootstrapError, bootstrap_admin_on_startup};
