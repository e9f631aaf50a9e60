use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router over a fresh in-memory store, as served by [`run`].
pub fn app(state: ServerState, frontend_dir: &str) -> Router {
    routes::build_router(state, build_cors(), frontend_dir)
}

async fn bind(cfg: &AppConfig) -> Result<TcpListener, StartupError> {
    let addr = cfg.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Serve `app` on `listener` until `shutdown` resolves; in-flight requests
/// are allowed to finish.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.frontend.dir).await?;

    let state = ServerState::in_memory();
    let app = app(state, &cfg.frontend.dir);

    let listener = bind(&cfg).await?;
    let addr = listener.local_addr()?;
    info!(%addr, frontend = %cfg.frontend.dir, "starting presence server");
    serve_until(listener, app, shutdown_signal()).await
}
