//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | All people, ordered by id |
//! | `POST`   | `/people` | Body: [`PersonBody`]; returns 201 + stored person |
//! | `GET`    | `/people/{id}` | 404 if not found |
//! | `PATCH`  | `/people/{id}` | Body: [`PersonPatch`]; any subset of input keys |
//! | `DELETE` | `/people/{id}` | 204, or 404 if not found |
//! | `POST`   | `/people/{id}/stats` | Body: `{"date":"YYYY-MM-DD", <metric>: <value>, ...}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use portfolio_core::{
  Person, PersonId, stats::DayMetrics, store::PersonStore,
  validate::ValidationErrors,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
  dto::{DOB_FORMAT, PersonBody, PersonPatch, PersonResponse},
  error::ApiError,
  password::hash_password,
};

/// Load a person or fail with 404.
pub(crate) async fn load<S: PersonStore>(store: &S, id: PersonId) -> Result<Person, ApiError> {
  store
    .get_person(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}

/// Validate `person`, folding in errors collected while binding.
fn check(person: &Person, mut errors: ValidationErrors) -> Result<(), ApiError> {
  if let Err(rule_errors) = person.validate() {
    errors.merge(rule_errors);
  }
  if errors.is_empty() {
    Ok(())
  } else {
    warn!(%errors, "rejected person payload");
    Err(ApiError::Validation(errors))
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S: PersonStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
  let people = store.list_people().await.map_err(ApiError::from_store)?;
  Ok(Json(people.iter().map(PersonResponse::from).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/{id}`
pub async fn get_one<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<PersonResponse>, ApiError> {
  let person = load(store.as_ref(), PersonId(id)).await?;
  Ok(Json(PersonResponse::from(&person)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`. Returns 201 with the stored person.
pub async fn create<S: PersonStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<PersonBody>,
) -> Result<impl IntoResponse, ApiError> {
  let mut errors = ValidationErrors::new();
  let mut person = body.bind(&mut errors);
  check(&person, errors)?;

  let hash = hash_password(person.password())?;
  person.set_password(hash);

  let saved = store.save(&person).await.map_err(ApiError::from_store)?;
  info!(id = ?saved.id(), email = saved.email(), "person created");
  Ok((StatusCode::CREATED, Json(PersonResponse::from(&saved))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /people/{id}`
pub async fn update<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<PersonPatch>,
) -> Result<Json<PersonResponse>, ApiError> {
  let mut person = load(store.as_ref(), PersonId(id)).await?;

  let mut errors = ValidationErrors::new();
  let new_password = patch.apply(&mut person, &mut errors);
  check(&person, errors)?;

  if new_password {
    let hash = hash_password(person.password())?;
    person.set_password(hash);
  }

  let saved = store.save(&person).await.map_err(ApiError::from_store)?;
  info!(id, "person updated");
  Ok(Json(PersonResponse::from(&saved)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/{id}`
pub async fn delete_one<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let deleted = store
    .delete_person(PersonId(id))
    .await
    .map_err(ApiError::from_store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  info!(id, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `POST /people/{id}/stats`: merges one day's metrics into the document.
///
/// The `date` key selects the day; every other key is stored as a metric.
pub async fn record_stats<S: PersonStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(mut body): Json<DayMetrics>,
) -> Result<Json<PersonResponse>, ApiError> {
  let date = match body.remove("date") {
    Some(Value::String(s)) => NaiveDate::parse_from_str(&s, DOB_FORMAT)
      .map_err(|_| ApiError::BadRequest(format!("invalid date {s:?}; expected yyyy-MM-dd")))?,
    _ => return Err(ApiError::BadRequest("missing \"date\" key".into())),
  };

  let mut person = load(store.as_ref(), PersonId(id)).await?;
  person.stats_mut().merge_day(date, body);

  let saved = store.save(&person).await.map_err(ApiError::from_store)?;
  info!(id, %date, "stats recorded");
  Ok(Json(PersonResponse::from(&saved)))
}
