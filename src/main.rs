//! muzee - music recommendations and playlists server

use actix_web::{middleware, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use muzee::config::{Paths, UserConfig};
use muzee::db::DbEngine;
use muzee::{build_cors, configure_app, AppState};

/// muzee - music recommendations and playlists
#[derive(Parser, Debug)]
#[command(name = "muzee")]
#[command(version)]
#[command(about = "Music recommendations from YouTube with per-user playlists")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5500)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reset password for a user
    #[arg(long)]
    password_reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!("{},sqlx=warn", log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("muzee v{} starting...", env!("CARGO_PKG_VERSION"));

    let paths = Paths::new(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    let config = UserConfig::load(&paths)?;

    let db = DbEngine::open(&paths.app_db_path())
        .await
        .context("Failed to open database")?;

    let state = AppState::new(db.clone(), config.clone());

    // Handle password reset mode
    if args.password_reset {
        let result = muzee::utils::tools::password_reset(&state.sessions).await;
        db.close().await;
        return result;
    }

    match state.sessions.purge_stale().await {
        Ok(0) => {}
        Ok(n) => info!("Removed {} stale sessions", n),
        Err(e) => warn!("Failed to purge stale sessions: {}", e),
    }

    if !config.has_youtube_key() {
        warn!("No YouTube API key configured, recommendations use the built-in catalog");
    }
    info!("Recommendation source: {}", state.recommender.source_name());

    let addr = format!("{}:{}", args.host, args.port);
    info!("Server listening on http://{}", addr);

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(configure_app(state.clone()))
    })
    .bind(addr)?
    .run()
    .await?;

    db.close().await;
    Ok(())
}
