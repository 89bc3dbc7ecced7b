//! colony-server - HTTP API for the mouse colony database

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colony_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use colony_common::db::init_database;
use colony_server::{build_router, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Parser)]
#[command(name = "colony-server", version, about = "Mouse colony HTTP API")]
struct Cli {
    /// Root folder holding colony.db
    #[arg(long, env = "COLONY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Bind address (default 127.0.0.1)
    #[arg(long, env = "COLONY_HOST")]
    host: Option<String>,

    /// Listen port (default 3000)
    #[arg(long, env = "COLONY_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let toml_config = TomlConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            toml_config
                .logging
                .level
                .parse::<Directive>()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        ))
        .init();

    info!(
        "Starting colony-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let host = cli
        .host
        .or_else(|| toml_config.host.clone())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let wechat = toml_config.wechat.clone();

    let root_folder = RootFolderResolver::new("colony-server")
        .with_cli_arg(cli.root_folder)
        .with_toml(toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    if !wechat.is_configured() {
        warn!("WeChat app credentials not configured; code-based WeChat login disabled");
    }

    let app = build_router(AppState::new(pool, wechat));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("colony-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
