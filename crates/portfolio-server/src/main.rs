//! Entry point: load settings, open the SQLite file, optionally seed it, then
//! serve the person API until interrupted.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use portfolio_server::{ServerConfig, app, expand_tilde, seed_store};
use portfolio_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Portfolio person API server")]
struct Cli {
  /// TOML settings file; a missing file falls back to defaults.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Insert the sample people before serving.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed || server_cfg.seed {
    let inserted = seed_store(&store).await.context("failed to seed store")?;
    tracing::info!(inserted, "seeding complete");
  }

  let address = server_cfg.address();
  tracing::info!(%address, "serving person API");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(Arc::new(store)))
    .await
    .context("server error")?;

  Ok(())
}
