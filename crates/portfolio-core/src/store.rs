//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `portfolio-store-sqlite`). The API layer and the server depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  person::{Person, PersonId},
  role::{Role, RoleId},
};

/// Classification a backend error exposes to higher layers, so they can map
/// failures without knowing the concrete backend.
pub trait StoreError {
  /// The email that collided, if this error is a uniqueness violation.
  fn duplicate_email(&self) -> Option<&str>;

  /// The role name that collided, if a role with that name already exists.
  fn duplicate_role(&self) -> Option<&str>;

  /// Whether the error reports a missing person or role.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a person store backend.
///
/// A backend owns the persisted layout: one row per person with a unique
/// email, the stats document in a single JSON column, and a join relation to
/// roles. Every read returns people with their full role set loaded.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + StoreError + Send + Sync + 'static;

  // ── Roles ─────────────────────────────────────────────────────────────

  /// Create and persist a role. Role names are unique.
  fn create_role(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  fn get_role(
    &self,
    id: RoleId,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  fn find_role_by_name(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  fn list_roles(&self) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist `person` and return the stored copy.
  ///
  /// A transient person is inserted and the returned copy carries the
  /// store-assigned id. A persisted person has its row and role associations
  /// overwritten. Fails if another person already holds the same email, in
  /// which case nothing is written. `person` itself is never modified, so a
  /// failed insert leaves the caller holding the same transient instance.
  fn save<'a>(
    &'a self,
    person: &'a Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn find_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All people ordered by id.
  fn list_people(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Remove a person and its role associations. Roles themselves survive.
  /// Returns `false` if no such person existed.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
