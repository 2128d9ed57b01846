//! csat-server - Customer satisfaction survey service
//!
//! Collects multi-step survey submissions from the browser wizard, persists
//! them to SQLite and an append-only CSV backstop, and exposes a
//! password-gated admin view for analytics, export, and bulk deletion.

use anyhow::Result;
use clap::Parser;
use csat_common::config::ServerConfig;
use csat_server::db::init_database;
use csat_server::{build_router, AppState, CsvSink, Store};
use tracing::info;

/// Command-line arguments; every option can also come from the environment
/// or the TOML config file (CLI wins)
#[derive(Debug, Parser)]
#[command(name = "csat-server", version, about = "Customer satisfaction survey service")]
struct Args {
    /// Folder holding the database file and the CSV backstop
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Admin read/export credential
    #[arg(long)]
    admin_password: Option<String>,

    /// Bulk-delete credential (distinct from the admin credential)
    #[arg(long)]
    delete_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting CSAT survey service (csat-server) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = ServerConfig::resolve(
        args.root_folder.as_deref(),
        args.port,
        args.admin_password.as_deref(),
        args.delete_password.as_deref(),
    )?;
    config.ensure_root_folder()?;
    info!("Root folder: {}", config.root_folder.display());

    let pool = init_database(&config.database_path()).await?;

    let sink = CsvSink::new(config.csv_path());
    sink.ensure_exists().await?;
    info!("CSV backstop: {}", config.csv_path().display());

    if config.admin_password.is_empty() {
        info!("Admin endpoints disabled (no admin password configured)");
    }

    let state = AppState::new(
        Store::new(pool, sink),
        config.admin_password.clone(),
        config.delete_password.clone(),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("csat-server listening on http://{}", config.bind_address());
    info!("Health check: http://{}/api/health", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
