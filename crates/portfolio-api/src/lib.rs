//! JSON REST API for the portfolio person store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`portfolio_core::store::PersonStore`]. Passwords are hashed here before a
//! person reaches the store and are never echoed back.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", portfolio_api::api_router(store.clone()))
//! ```

pub mod dto;
pub mod error;
pub mod password;
pub mod people;
pub mod roles;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use portfolio_core::store::PersonStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .patch(people::update::<S>)
        .delete(people::delete_one::<S>),
    )
    .route("/people/{id}/stats", post(people::record_stats::<S>))
    // Roles
    .route(
      "/people/{id}/roles/{role}",
      put(roles::attach::<S>).delete(roles::detach::<S>),
    )
    .route("/roles", get(roles::list::<S>))
    .with_state(store)
}
