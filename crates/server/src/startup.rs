use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, ServerState};
use service::{
    auth::{domain::BootstrapInput, AdminAuthService},
    notify::sender_from_config,
    runtime,
    scheduler::start_reminder_scheduler,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Create the admin from `ADMIN_INITIAL_PASSWORD` when supplied; otherwise
/// only warn if no admin exists yet.
async fn ensure_admin(auth: &AdminAuthService) -> anyhow::Result<()> {
    match BootstrapInput::from_env() {
        Some(input) => {
            let outcome = auth.bootstrap(input).await?;
            info!(event = "admin_bootstrap", ?outcome, "admin credential checked");
        }
        None if !auth.has_admin().await? => {
            warn!(
                event = "admin_missing",
                "no admin credential; set ADMIN_INITIAL_PASSWORD or run admin_bootstrap before logging in"
            );
        }
        None => {}
    }
    Ok(())
}

/// Public entry: build the app from a validated config and run the HTTP server.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let stores = runtime::prepare_storage(&cfg.storage.data_dir).await?;
    let sender = sender_from_config(&cfg.mail)?;
    let state = ServerState::build(&stores, sender, &cfg);

    ensure_admin(&state.auth).await?;

    // the handle keeps the job alive for the lifetime of the server
    let _scheduler = if cfg.scheduler.enabled {
        Some(start_reminder_scheduler(state.reminders.clone(), state.run_guard.clone(), &cfg.scheduler.cron).await?)
    } else {
        info!(event = "scheduler_disabled", "daily reminder scheduler disabled by configuration");
        None
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, data_dir = %cfg.storage.data_dir, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
