//! speakcheck-web - Spoken English assessment service
//!
//! Resolves configuration (CLI → environment/.env → TOML → defaults),
//! opens the assessment database and serves the web application.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use speakcheck_common::config::{self, TomlConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use speakcheck_web::services::LanguageConfidenceClient;
use speakcheck_web::{build_router, AppState};

/// Command-line arguments for speakcheck-web
#[derive(Parser, Debug)]
#[command(name = "speakcheck-web")]
#[command(about = "Spoken English assessment web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "SPEAKCHECK_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "SPEAKCHECK_BIND")]
    bind: IpAddr,

    /// SQLite database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Speech-assessment API key (overrides LC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "SPEAKCHECK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "speakcheck_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting SpeakCheck (speakcheck-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(path) = &dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let toml_config = TomlConfig::load_or_default(config_path.as_deref());

    let database_url = config::resolve_database_url(args.database_url.as_deref(), &toml_config)?;
    let api_key = config::resolve_api_key(args.api_key.as_deref(), &toml_config)?;
    let api_url = config::resolve_api_url(&toml_config);
    let timeout = Duration::from_secs(toml_config.request_timeout_secs());
    let session_ttl = Duration::from_secs(toml_config.session_ttl_secs());

    let pool = speakcheck_common::db::init_database(&database_url)
        .await
        .context("Failed to initialize database")?;

    match speakcheck_web::db::count_assessments(&pool).await {
        Ok(count) => info!("Database ready ({} stored assessments)", count),
        Err(e) => warn!("Could not count stored assessments: {}", e),
    }

    let client = LanguageConfidenceClient::new(api_key, api_url, timeout)
        .context("Failed to build assessment client")?;
    info!(
        "Assessment endpoint: {} (timeout {}s)",
        client.api_url(),
        timeout.as_secs()
    );

    let state = AppState::new(pool, Arc::new(client)).with_session_ttl(session_ttl);
    info!("Session idle timeout: {}s", session_ttl.as_secs());
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("speakcheck-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
