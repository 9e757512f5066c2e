//! Manage roles and role membership in a JSON identity snapshot.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use role_admin::bootstrap::{AdminAccountSettings, bootstrap_admin_on_startup};
use role_admin::domain::{MembershipReconciliationService, RoleRegistryService};
use role_admin::inbound::cli::{
    CliArgs, CliCommand, CliState, handle_members, handle_roles, render_bootstrap,
};
use role_admin::outbound::identity::{InMemoryIdentityStore, SnapshotFile};
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<ExitCode> {
    let snapshot = SnapshotFile::new(&args.store);
    let store = Arc::new(
        snapshot
            .load()
            .wrap_err_with(|| format!("load identity snapshot {}", args.store.display()))?,
    );

    let result = match args.command {
        CliCommand::Bootstrap => {
            let settings = AdminAccountSettings::load_from_iter([OsString::from("role-admin")])
                .map_err(|e| eyre!("load administrator settings: {e}"))?;
            let outcome = bootstrap_admin_on_startup(&settings, Arc::clone(&store))
                .await
                .wrap_err("bootstrap administrator account")?;
            Ok(render_bootstrap(&outcome))
        }
        CliCommand::Roles(command) => handle_roles(&cli_state(&store), command).await,
        CliCommand::Members(command) => handle_members(&cli_state(&store), command).await,
    };

    match result {
        Ok(output) => {
            let report = output
                .commit(|| snapshot.save(&store))
                .wrap_err_with(|| format!("save identity snapshot {}", args.store.display()))?;
            print_report(report);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            error!(error = %failure, "command failed");
            eprintln!("error: {failure}");
            Ok(ExitCode::from(failure.exit_code()))
        }
    }
}

fn cli_state(store: &Arc<InMemoryIdentityStore>) -> CliState {
    CliState::new(
        Arc::new(RoleRegistryService::new(Arc::clone(store))),
        Arc::new(MembershipReconciliationService::new(Arc::clone(store))),
    )
}

fn print_report(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
