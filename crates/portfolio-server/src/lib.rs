//! HTTP server wiring for the portfolio person store.
//!
//! Layers configuration, request tracing and optional seeding around
//! [`portfolio_api::api_router`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use portfolio_api::password::hash_password;
use portfolio_core::{seed, store::PersonStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PORTFOLIO_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Insert the sample people on startup.
  pub seed:       bool,
}

impl ServerConfig {
  /// Read `file` (optional) layered under the environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8085)?
      .set_default("store_path", "portfolio.db")?
      .set_default("seed", false)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("PORTFOLIO"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, suitable for binding.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: API routes plus request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: PersonStore + 'static,
{
  portfolio_api::api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// Persist every sample person whose email is not yet taken. Returns how many
/// were inserted, so repeated runs insert nothing.
pub async fn seed_store<S: PersonStore>(store: &S) -> anyhow::Result<usize> {
  let mut inserted = 0;
  for mut person in seed::init() {
    let email = person.email().to_owned();
    if store.find_by_email(email.clone()).await?.is_some() {
      tracing::debug!(%email, "seed person already present");
      continue;
    }
    let hash = hash_password(person.password())?;
    person.set_password(hash);
    let saved = store.save(&person).await?;
    tracing::info!(id = ?saved.id(), %email, "seeded person");
    inserted += 1;
  }
  Ok(inserted)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use portfolio_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/portfolio.toml")).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8085");
    assert_eq!(cfg.store_path, PathBuf::from("portfolio.db"));
    assert!(!cfg.seed);
  }

  #[test]
  fn expand_tilde_leaves_plain_paths_alone() {
    let p = Path::new("/var/lib/portfolio.db");
    assert_eq!(expand_tilde(p), p);
  }

  #[test]
  fn expand_tilde_uses_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/portfolio.db")),
      PathBuf::from(home).join("data/portfolio.db")
    );
  }

  #[tokio::test]
  async fn seeding_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    assert_eq!(seed_store(&store).await.unwrap(), 3);
    assert_eq!(seed_store(&store).await.unwrap(), 0);

    let people = store.list_people().await.unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Haseeb Beg", "Tirth Thakkar", "Test"]);
    assert!(people.iter().all(|p| p.password() != "password"));
  }

  #[tokio::test]
  async fn app_serves_seeded_people() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    seed_store(store.as_ref()).await.unwrap();

    let resp = app(store)
      .oneshot(Request::builder().uri("/people").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let people: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(people.as_array().unwrap().len(), 3);
    assert_eq!(people[2]["age"], -1);
    assert_eq!(people[0]["dob"], "1840-01-01");
  }
}
