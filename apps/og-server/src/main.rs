//! Blog preview image server
//!
//! Serves the Open-Graph preview images of a bilingual blog:
//!
//! - `GET /ai` renders an ad-hoc preview from query parameters and returns an
//!   HTML page embedding it as a data URI
//! - `GET /og/app/{slug}.png` renders the preview of a stored post as PNG
//! - `GET /health` reports service status
//!
//! Posts are read from the blog's SQLite database; this server never writes
//! to it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use og_render::{FontRegistry, PreviewRenderer};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod pages;
mod state;
mod store;
#[cfg(test)]
mod tests;

use state::{build_router, AppState};
use store::PostStore;

/// Command-line arguments for the preview server
#[derive(Parser, Debug)]
#[command(name = "og-server")]
#[command(about = "Open-Graph preview image server for the blog")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Blog database holding the posts table
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:blog.db")]
    database_url: String,

    /// Font file for the secondary (Bengali) title
    #[arg(
        long,
        env = "OG_SECONDARY_FONT",
        default_value = "public/static/NotoSansBengali-Regular.ttf"
    )]
    secondary_font: PathBuf,

    /// Primary title used when `/ai` is called without one
    #[arg(long, env = "OG_DEFAULT_TITLE", default_value = state::DEFAULT_TITLE)]
    default_title: String,

    /// Render timeout in milliseconds
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Burst allowance for a per-second rate limit
fn burst_size(rate_limit: u32) -> u32 {
    rate_limit.saturating_mul(2)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting og-server on {}:{}", args.host, args.port);

    // Fonts are registered once, before any request is served.
    let fonts = FontRegistry::register(Some(&args.secondary_font))?;
    let renderer = PreviewRenderer::new(fonts);

    let posts = PostStore::connect(&args.database_url).await?;

    let state = AppState {
        renderer,
        posts,
        default_title: args.default_title.into(),
        timeout_ms: args.timeout_ms,
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(burst_size(args.rate_limit))
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let app = build_router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Render timeout: {}ms", args.timeout_ms);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
