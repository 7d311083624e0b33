//! Focusbrew - a Pomodoro focus timer with a session-recording backend
//!
//! This is the main entry point for the focusbrew application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use focusbrew::{
    api::{create_router, AppState},
    client::SessionClient,
    config::{Command, Config},
    recorder::{Database, SessionRecorder},
    timer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The timer owns stdout for its countdown display, so its logs go to
    // stderr; the server keeps the default writer.
    let filter = format!("focusbrew={},tower_http=info", config.log_level());
    match &config.command {
        Command::Timer { .. } => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        Command::Serve { .. } => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    match config.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => {
            info!("Starting focusbrew recorder v{}", env!("CARGO_PKG_VERSION"));

            // Storage handle lifecycle: opened here, closed once the server
            // has wound down.
            let db = Database::open(&db_path)?;
            let recorder = SessionRecorder::new(db.clone());
            let state = Arc::new(AppState::new(recorder, port, host.clone()));

            let app = create_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = TcpListener::bind(&addr).await?;

            info!("Recorder running on http://{}", addr);
            info!("Endpoints:");
            info!("  POST /sessions - Record a completed focus session");
            info!("  GET  /status   - Recorder status");
            info!("  GET  /health   - Health check");

            let server = axum::serve(listener, app);

            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_signal() => {
                    info!("Shutdown signal received");
                }
            }

            db.close();
            info!("Recorder shutdown complete");
        }

        Command::Timer { server } => {
            info!("Reporting completed sessions to {}", server);
            let client = SessionClient::new(&server);
            timer::run(client).await?;
        }
    }

    Ok(())
}
