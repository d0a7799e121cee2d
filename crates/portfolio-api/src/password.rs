//! Password hashing applied by the binding layer before a person is stored.

use argon2::{
  Argon2,
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;

use crate::error::ApiError;

/// Hash `plain` into an argon2 PHC string.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plain.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::PasswordHash(e.to_string()))
}

/// Check `plain` against a PHC string. Malformed hashes never verify.
pub fn verify_password(plain: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed))
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_and_verify_roundtrip() {
    let hash = hash_password("password").expect("hashing should succeed");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("password", &hash));
  }

  #[test]
  fn verify_rejects_wrong_password() {
    let hash = hash_password("correct-horse").expect("hashing should succeed");
    assert!(!verify_password("battery-staple", &hash));
  }

  #[test]
  fn verify_rejects_malformed_hash() {
    assert!(!verify_password("anything", "not-a-valid-hash"));
  }
}
