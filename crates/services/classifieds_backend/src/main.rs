use std::process::ExitCode;
use std::sync::Arc;

use classifieds_backend::{build_app, spawn_auth_event_log, StartupError};
use classifieds_common::logging;
use classifieds_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Arc::new(load_config()?);
    let app = build_app(config.clone()).await?;
    spawn_auth_event_log(&app.auth);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.router.into_make_service()).await?;
    Ok(())
}
