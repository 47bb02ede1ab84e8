//! ramme service host.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                  SERVICE                      │
//!                 │                                               │
//!  config.yaml ──▶│  ConfigStore ──▶ BasicSettings                │
//!                 │       ▲               │                       │
//!                 │       │ reload        ▼                       │
//!                 │  ConfigWatcher    ┌─────────────── Group ───┐ │
//!                 │                   │ grpc      (host:6560)   │ │
//!                 │                   │ http      (host:8080)   │ │
//!                 │                   │ http-admin(host:8081)   │ │
//!                 │                   │ signals                 │ │
//!                 │                   └─────────────────────────┘ │
//!                 │  first actor to exit stops all the others     │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Router};
use clap::Parser;

use ramme::config::{BasicSettings, ConfigStore};
use ramme::http::HandlerError;
use ramme::lifecycle::Service;
use ramme::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "ramme")]
#[command(about = "gRPC + HTTP service host", long_about = None)]
struct Cli {
    /// YAML config file. Without one the built-in defaults are used.
    #[arg(short, long, env = "RAMME_CONFIG")]
    config: Option<PathBuf>,
}

async fn ping() -> &'static str {
    "pong"
}

async fn echo(body: String) -> Result<String, HandlerError> {
    if body.is_empty() {
        return Err(HandlerError::BadRequest("empty body".into()));
    }
    Ok(body)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => match ConfigStore::load(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("ramme: {}", e);
                std::process::exit(1);
            }
        },
        None => ConfigStore::with_defaults(),
    };
    let store = Arc::new(store);

    let settings = BasicSettings::from_store(&store);
    if let Err(e) = init_logging(settings.log_level, settings.is_local_environment) {
        eprintln!("ramme: failed to initialize logging: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "ramme starting"
    );

    let router = Router::new()
        .route("/ping", get(ping))
        .route("/echo", axum::routing::post(echo));

    let mut service = Service::new(store).with_router(router);
    if let Some(path) = &cli.config {
        service = service.with_config_path(path);
    }

    if let Err(e) = service.run().await {
        tracing::error!(error = %e, "Service terminated");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
