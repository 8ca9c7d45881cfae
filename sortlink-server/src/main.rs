use anyhow::Context;
use clap::Parser;
use sortlink_config::{ConfigSource, SortingConfig};
use sortlink_server::{AppState, create_app};
use std::{net::SocketAddr, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "sortlink-server")]
#[command(about = "Demo listing with sortable columns")]
struct Cli {
    /// Server host
    #[arg(long, env = "SORTLINK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, env = "SORTLINK_PORT", default_value_t = 8000)]
    port: u16,

    /// Sorting config file (TOML or JSON). Overrides SORTLINK_CONFIG_PATH.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<(SortingConfig, ConfigSource)> {
    match &cli.config {
        Some(path) => {
            let config = SortingConfig::load_from_file(path)?;
            config.validate().with_context(|| {
                format!("invalid sorting config {}", path.display())
            })?;
            Ok((config, ConfigSource::File(path.clone())))
        }
        None => SortingConfig::load_from_env(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if env_file_loaded {
        info!("loaded .env file");
    }

    let cli = Cli::parse();
    let (config, source) =
        load_config(&cli).context("failed to load sorting configuration")?;

    match &source {
        ConfigSource::Default => info!("using default sorting config"),
        ConfigSource::EnvPath(path) | ConfigSource::File(path) => {
            info!(path = %path.display(), "sorting config loaded from file")
        }
        ConfigSource::EnvInline => {
            info!("sorting config loaded from inline environment json")
        }
    }
    info!(
        behavior = ?config.invalid_field_behavior,
        separator = %config.path_separator,
        "sorting configured"
    );

    let app = create_app(AppState::new(&config));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cli.host, cli.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting sortlink demo server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
