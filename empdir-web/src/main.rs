//! empdir-web - Employee directory web server
//!
//! Serves the paginated listing and the add/update/delete forms on top of a
//! single SQLite database. The schema is created on startup when missing.

use anyhow::{Context, Result};
use clap::Parser;
use empdir_common::config::{Config, ConfigOverrides};
use empdir_web::{build_router, cookie_key, AppState};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Employee directory web server
#[derive(Parser, Debug)]
#[clap(name = "empdir-web")]
#[clap(about = "Serve the employee directory over HTTP")]
struct Args {
    /// TOML config file (default: <config dir>/empdir/config.toml)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[clap(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Listen address
    #[clap(long)]
    listen_addr: Option<IpAddr>,

    /// Listen port
    #[clap(long)]
    port: Option<u16>,

    /// Log level (overridden by RUST_LOG)
    #[clap(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Warnings are held until the subscriber exists, which needs the resolved level
    let (cfg, config_warnings) = Config::resolve_with_warnings(ConfigOverrides {
        config_file: args.config,
        database_path: args.database,
        listen_addr: args.listen_addr,
        port: args.port,
        log_level: args.log_level,
    });

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    for warning in &config_warnings {
        warn!("{}", warning);
    }

    // Build identification first, before any database delay
    info!(
        "Starting empdir-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", cfg.database_path.display());

    let pool = match empdir_common::db::init_database(&cfg.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    if cfg.secret_key.is_none() {
        warn!("No secret key configured (EMPDIR_SECRET_KEY); using a random key, cookies will not survive a restart");
    }
    let key = cookie_key(cfg.secret_key.as_deref());

    let state = AppState::new(pool.clone(), key).context("Failed to compile page templates")?;
    let app = build_router(state);

    let addr = SocketAddr::new(cfg.listen_addr, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("empdir-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
