use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tweetrss::config::{Config, FileConfig, Overrides};
use tweetrss::{server, Error, FeedService, TimelineCache, TwitterClient};

#[derive(Parser)]
#[command(name = "tweetrss")]
#[command(about = "Serve Twitter timelines as RSS feeds", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, env = "TWEETRSS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of static files served for every path outside /feed
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so it can set RUST_LOG too
    let dotenv = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("ignoring unreadable .env file: {}", err);
        }
    }

    let cli = Cli::parse();
    let file = FileConfig::discover(cli.config.as_deref())?;
    let config = Config::resolve(
        file,
        Overrides {
            host: cli.host,
            port: cli.port,
            public_dir: cli.public_dir,
        },
        |key| std::env::var(key).ok(),
    )?;

    let client = TwitterClient::connect(&config.api_base, &config.credentials, config.request_timeout)
        .await
        .map_err(Error::Credential)?
        .timeline_count(config.timeline_count);

    let service = Arc::new(FeedService::new(
        Arc::new(client),
        TimelineCache::new(config.cache_ttl),
    ));
    let app = server::router(service, config.public_dir.clone());

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    server::serve(listener, app, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
