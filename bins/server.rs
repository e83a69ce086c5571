//! Weigh Lanka API server: loads and validates configuration once, builds the
//! runtime sized from it, then serves until Ctrl+C.

use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn install_panic_hook(service_id: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, message = %info, "unhandled panic occurred");
    }));
}

async fn serve(cfg: AppConfig, service_id: Uuid) -> ExitCode {
    let server_task = tokio::spawn(server::run(cfg));

    tokio::select! {
        res = server_task => match res {
            Ok(Ok(())) => {
                info!(service = "server", event = "stop", %service_id, "server stopped normally");
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service = "server", event = "run_failed", error = %e, "server exited with error");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // an in-flight reminder run is dropped; the next cron tick starts fresh
            info!(service = "server", event = "shutdown_signal", %service_id, "received Ctrl+C, shutting down");
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    // .env first so RUST_LOG, LOG_FORMAT and config overrides apply
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let service_id = Uuid::new_v4();
    install_panic_hook(service_id);

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "refusing to start with invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        data_dir = %cfg.storage.data_dir,
        "server starting"
    );

    rt.block_on(serve(cfg, service_id))
}
