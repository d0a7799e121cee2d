//! A role is a shared, independently-owned entity referenced by people.
//!
//! A person holds references to roles but never owns them: deleting a person
//! removes only the association.

use std::{
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Store-assigned identity of a [`Role`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoleId(pub i64);

impl fmt::Display for RoleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A reference to a persisted role.
///
/// Equality, ordering and hashing consider only `id`, so a set of roles can
/// never hold the same role twice even if a stale copy carries an old name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
  pub id:   RoleId,
  pub name: String,
}

impl Role {
  pub fn new(id: RoleId, name: impl Into<String>) -> Self {
    Self { id, name: name.into() }
  }
}

impl PartialEq for Role {
  fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Role {}

impl PartialOrd for Role {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Role {
  fn cmp(&self, other: &Self) -> Ordering { self.id.cmp(&other.id) }
}

impl Hash for Role {
  fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  #[test]
  fn roles_compare_by_id_only() {
    let a = Role::new(RoleId(1), "ROLE_USER");
    let stale = Role::new(RoleId(1), "ROLE_RENAMED");
    assert_eq!(a, stale);

    let mut set = BTreeSet::new();
    assert!(set.insert(a));
    assert!(!set.insert(stale));
    assert_eq!(set.len(), 1);
  }
}
