//! Create or reset the admin credential.
//!
//! Reads `ADMIN_INITIAL_PASSWORD` (required, at least 8 characters),
//! `ADMIN_USERNAME` (default `admin`) and `ADMIN_RESET` (`true` to overwrite an
//! existing password) from the environment or `.env`, and writes the argon2
//! hash into the configured data directory.

use dotenvy::dotenv;
use service::auth::{domain::{BootstrapInput, BootstrapOutcome}, AdminAuthService};
use tracing::{error, info};

async fn bootstrap() -> anyhow::Result<BootstrapOutcome> {
    let Some(input) = BootstrapInput::from_env() else {
        anyhow::bail!("ADMIN_INITIAL_PASSWORD is not set; refusing to create an admin without an operator secret");
    };

    // the token secret is irrelevant here, so the unvalidated config is enough
    let cfg = configs::AppConfig::load_or_default()?;
    let stores = service::runtime::prepare_storage(&cfg.storage.data_dir).await?;
    let auth = AdminAuthService::new(stores.admins.clone(), cfg.auth.clone());
    let outcome = auth.bootstrap(input).await?;
    info!(service = "admin_bootstrap", event = "done", ?outcome, data_dir = %cfg.storage.data_dir, "admin bootstrap finished");
    Ok(outcome)
}

fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "admin_bootstrap", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    match rt.block_on(bootstrap()) {
        Ok(_) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "admin_bootstrap", event = "failed", error = %e, "admin bootstrap failed");
            std::process::ExitCode::FAILURE
        }
    }
}
