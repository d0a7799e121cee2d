//! Error type for `portfolio-store-sqlite`.

use portfolio_core::{PersonId, RoleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] portfolio_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// Another person already holds this email.
  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("role already exists: {0}")]
  DuplicateRole(String),

  /// Attempted to update a persisted person whose row no longer exists.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  /// A person references a role that is not stored.
  #[error("role not found: {0}")]
  RoleNotFound(RoleId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl portfolio_core::store::StoreError for Error {
  fn duplicate_email(&self) -> Option<&str> {
    match self {
      Error::DuplicateEmail(email) => Some(email),
      _ => None,
    }
  }

  fn duplicate_role(&self) -> Option<&str> {
    match self {
      Error::DuplicateRole(name) => Some(name),
      _ => None,
    }
  }

  fn is_not_found(&self) -> bool {
    matches!(self, Error::PersonNotFound(_) | Error::RoleNotFound(_))
  }
}
