//! LinkLens server
//!
//! Binds the preview API and serves the static frontend assets.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;

use linklens::handlers::{api_router, AppState};
use linklens::limiter::{SlidingWindowLimiter, DEFAULT_MAX_REQUESTS};
use linklens::service::ExtractionService;

/// LinkLens preview server
#[derive(Parser, Debug)]
#[command(name = "linklens")]
#[command(version)]
#[command(about = "Social link preview metadata server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory of static assets served at /
    #[arg(long, default_value = "public")]
    assets_dir: PathBuf,

    /// Allowed requests per client per minute
    #[arg(long, default_value_t = DEFAULT_MAX_REQUESTS)]
    rate_limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let limiter = Arc::new(SlidingWindowLimiter::new(args.rate_limit));
    let _sweeper = SlidingWindowLimiter::spawn_sweeper(Arc::clone(&limiter));

    let state = Arc::new(AppState::new(ExtractionService::new(), limiter));
    let app: Router = api_router(state).fallback_service(ServeDir::new(&args.assets_dir));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("linklens listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
