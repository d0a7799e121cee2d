//! Handler failures and their HTTP status and JSON body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use portfolio_core::{store::StoreError, validate::ValidationErrors};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The payload bound but breached one or more field constraints.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error, surfacing uniqueness and missing-row failures.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + StoreError + Send + Sync + 'static,
  {
    if let Some(email) = e.duplicate_email() {
      ApiError::Conflict(format!("email already registered: {email}"))
    } else if let Some(name) = e.duplicate_role() {
      ApiError::Conflict(format!("role already exists: {name}"))
    } else if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation(fields) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "validation failed", "fields": fields }),
      ),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::PasswordHash(_) | ApiError::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": self.to_string() }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
