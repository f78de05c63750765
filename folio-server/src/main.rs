//! # Folio Server
//!
//! Read-only search API over a Project Gutenberg style book catalog.
//!
//! ## Overview
//!
//! The server exposes a single search operation:
//!
//! - **`GET /books`**: filter by Gutenberg id, title, author, language,
//!   MIME type, and topic; results are paginated 25 to a page and ordered
//!   by download count
//! - **`GET /ping` / `GET /health`**: liveness and database reachability
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL (via sqlx) for the catalog store
//! - folio-core for filter normalization, query building, and hydration

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::PostgresCatalog;
use folio_server::{
    infra::{app_state::AppState, config},
    routes,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Read-only search API over a Project Gutenberg style book catalog")]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // Quieter defaults; override via RUST_LOG.
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config::ConfigLoad {
        mut config,
        env_file_loaded,
    } = config::load().context("failed to load configuration")?;

    if env_file_loaded {
        info!("loaded .env file");
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    info!("Connecting to PostgreSQL");
    let catalog = PostgresCatalog::new(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;

    let state = AppState {
        catalog: Arc::new(catalog),
        config: Arc::new(config),
    };

    let app = routes::create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server address")?;
    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
