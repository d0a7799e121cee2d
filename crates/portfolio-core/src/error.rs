//! Error types for `portfolio-core`.

use thiserror::Error;

use crate::person::PersonId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person {current} cannot be re-identified as {attempted}")]
  IdentityReassigned {
    current:   PersonId,
    attempted: PersonId,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
