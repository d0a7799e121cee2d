//! Handlers for role endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/roles` | All roles, ordered by id |
//! | `PUT`    | `/people/{id}/roles/{role}` | Creates the role if needed; idempotent |
//! | `DELETE` | `/people/{id}/roles/{role}` | 404 if the role does not exist |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use portfolio_core::{
  PersonId, Role,
  store::{PersonStore, StoreError as _},
};
use tracing::{debug, info};

use crate::{dto::PersonResponse, error::ApiError, people::load};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /roles`
pub async fn list<S: PersonStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Role>>, ApiError> {
  let roles = store.list_roles().await.map_err(ApiError::from_store)?;
  Ok(Json(roles))
}

/// Look up a role by name, creating it if absent. A concurrent request may
/// create the same role between the lookup and the insert; the insert then
/// reports a duplicate and the existing row is read back.
async fn find_or_create_role<S: PersonStore>(store: &S, name: String) -> Result<Role, ApiError> {
  if let Some(role) = store
    .find_role_by_name(name.clone())
    .await
    .map_err(ApiError::from_store)?
  {
    return Ok(role);
  }

  match store.create_role(name.clone()).await {
    Ok(role) => {
      info!(role = %role.name, id = %role.id, "role created");
      Ok(role)
    }
    Err(e) if e.duplicate_role().is_some() => {
      debug!(role = %name, "role created concurrently; reloading");
      store
        .find_role_by_name(name.clone())
        .await
        .map_err(ApiError::from_store)?
        .ok_or_else(|| ApiError::NotFound(format!("role {name:?} not found")))
    }
    Err(e) => Err(ApiError::from_store(e)),
  }
}

// ─── Attach ───────────────────────────────────────────────────────────────────

/// `PUT /people/{id}/roles/{role}`
pub async fn attach<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path((id, name)): Path<(i64, String)>,
) -> Result<Json<PersonResponse>, ApiError> {
  if name.trim().is_empty() {
    return Err(ApiError::BadRequest("role name must not be blank".into()));
  }

  let mut person = load(store.as_ref(), PersonId(id)).await?;

  let role = find_or_create_role(store.as_ref(), name).await?;

  if !person.add_role(role.clone()) {
    return Ok(Json(PersonResponse::from(&person)));
  }

  let saved = store.save(&person).await.map_err(ApiError::from_store)?;
  info!(id, role = %role.name, "role attached");
  Ok(Json(PersonResponse::from(&saved)))
}

// ─── Detach ───────────────────────────────────────────────────────────────────

/// `DELETE /people/{id}/roles/{role}`
pub async fn detach<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path((id, name)): Path<(i64, String)>,
) -> Result<Json<PersonResponse>, ApiError> {
  let mut person = load(store.as_ref(), PersonId(id)).await?;

  let role = store
    .find_role_by_name(name.clone())
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {name:?} not found")))?;

  if !person.remove_role(&role) {
    return Ok(Json(PersonResponse::from(&person)));
  }

  let saved = store.save(&person).await.map_err(ApiError::from_store)?;
  info!(id, role = %role.name, "role detached");
  Ok(Json(PersonResponse::from(&saved)))
}
