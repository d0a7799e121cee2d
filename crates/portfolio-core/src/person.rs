//! A person is an application user with login credentials, profile fields,
//! role references and a daily stats document.
//!
//! A person is either *transient* (no `id`) or *persisted* (has an `id`
//! assigned by a store). Identity never changes once assigned.

use std::{
  collections::BTreeSet,
  fmt,
  hash::{Hash, Hasher},
};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  role::Role,
  stats::Stats,
  validate::{ValidationErrors, validate_person},
};

/// Returned by [`Person::age`] when no date of birth is known.
pub const UNKNOWN_AGE: i32 = -1;

/// Store-assigned identity of a [`Person`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Clone, Default)]
pub struct Person {
  id:              Option<PersonId>,
  email:           String,
  /// Opaque; hashing happens before the value reaches the entity.
  password:        String,
  hobby:           String,
  /// Free-text label, conventionally "true", "false" or "maybe".
  is_degenerate:   String,
  smart_car_color: String,
  name:            String,
  dob:             Option<NaiveDate>,
  roles:           BTreeSet<Role>,
  stats:           Stats,
}

impl Person {
  /// An empty transient person with no roles and no stats.
  pub fn new() -> Self { Self::default() }

  /// Build a transient person from the fields accepted by the API.
  pub fn from_api(
    email: impl Into<String>,
    password: impl Into<String>,
    name: impl Into<String>,
    hobby: impl Into<String>,
    is_degenerate: impl Into<String>,
    smart_car_color: impl Into<String>,
    dob: Option<NaiveDate>,
  ) -> Self {
    Self {
      id: None,
      email: email.into(),
      password: password.into(),
      hobby: hobby.into(),
      is_degenerate: is_degenerate.into(),
      smart_car_color: smart_car_color.into(),
      name: name.into(),
      dob,
      roles: BTreeSet::new(),
      stats: Stats::new(),
    }
  }

  // ── Identity ────────────────────────────────────────────────────────────

  pub fn id(&self) -> Option<PersonId> { self.id }

  pub fn is_persisted(&self) -> bool { self.id.is_some() }

  /// Record the identity a store assigned on first persist.
  ///
  /// Re-assigning the same id is a no-op; assigning a different one fails.
  pub fn assign_id(&mut self, id: PersonId) -> Result<()> {
    match self.id {
      Some(current) if current != id => {
        Err(Error::IdentityReassigned { current, attempted: id })
      }
      _ => {
        self.id = Some(id);
        Ok(())
      }
    }
  }

  // ── Attributes ──────────────────────────────────────────────────────────

  pub fn email(&self) -> &str { &self.email }

  pub fn set_email(&mut self, email: impl Into<String>) { self.email = email.into(); }

  pub fn password(&self) -> &str { &self.password }

  pub fn set_password(&mut self, password: impl Into<String>) {
    self.password = password.into();
  }

  pub fn hobby(&self) -> &str { &self.hobby }

  pub fn set_hobby(&mut self, hobby: impl Into<String>) { self.hobby = hobby.into(); }

  pub fn is_degenerate(&self) -> &str { &self.is_degenerate }

  pub fn set_is_degenerate(&mut self, label: impl Into<String>) {
    self.is_degenerate = label.into();
  }

  pub fn smart_car_color(&self) -> &str { &self.smart_car_color }

  pub fn set_smart_car_color(&mut self, color: impl Into<String>) {
    self.smart_car_color = color.into();
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

  pub fn dob(&self) -> Option<NaiveDate> { self.dob }

  pub fn set_dob(&mut self, dob: Option<NaiveDate>) { self.dob = dob; }

  pub fn stats(&self) -> &Stats { &self.stats }

  pub fn stats_mut(&mut self) -> &mut Stats { &mut self.stats }

  pub fn set_stats(&mut self, stats: Stats) { self.stats = stats; }

  /// Text value of a field by its API name; used by the validation rules.
  pub fn field_text(&self, field: &str) -> Option<&str> {
    match field {
      "email" => Some(&self.email),
      "password" => Some(&self.password),
      "hobby" => Some(&self.hobby),
      "isDegenerate" => Some(&self.is_degenerate),
      "smartCarColor" => Some(&self.smart_car_color),
      "name" => Some(&self.name),
      _ => None,
    }
  }

  // ── Roles ───────────────────────────────────────────────────────────────

  pub fn roles(&self) -> &BTreeSet<Role> { &self.roles }

  /// Returns `false` if the role was already present.
  pub fn add_role(&mut self, role: Role) -> bool { self.roles.insert(role) }

  pub fn remove_role(&mut self, role: &Role) -> bool { self.roles.remove(role) }

  pub fn has_role(&self, role: &Role) -> bool { self.roles.contains(role) }

  pub fn set_roles(&mut self, roles: impl IntoIterator<Item = Role>) {
    self.roles = roles.into_iter().collect();
  }

  // ── Derived ─────────────────────────────────────────────────────────────

  /// Whole years between `dob` and today's date in the process's local time
  /// zone, or [`UNKNOWN_AGE`] when `dob` is unset.
  pub fn age(&self) -> i32 { self.age_on(Local::now().date_naive()) }

  /// [`Person::age`] evaluated against an explicit civil date.
  ///
  /// A future `dob` yields a non-positive count of whole years.
  pub fn age_on(&self, today: NaiveDate) -> i32 {
    match self.dob {
      None => UNKNOWN_AGE,
      Some(dob) if dob <= today => whole_years(dob, today),
      Some(dob) => -whole_years(today, dob),
    }
  }

  // ── Validation ──────────────────────────────────────────────────────────

  pub fn validate(&self) -> Result<(), ValidationErrors> { validate_person(self) }
}

/// Completed years from `from` to `to`, where `from <= to`.
fn whole_years(from: NaiveDate, to: NaiveDate) -> i32 {
  let years = to.year() - from.year();
  if (to.month(), to.day()) < (from.month(), from.day()) {
    years - 1
  } else {
    years
  }
}

// ─── Identity semantics ──────────────────────────────────────────────────────

impl PartialEq for Person {
  fn eq(&self, other: &Self) -> bool {
    match (self.id, other.id) {
      (Some(a), Some(b)) => a == b,
      _ => std::ptr::eq(self, other),
    }
  }
}

impl Eq for Person {}

impl Hash for Person {
  fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

// ─── String forms ────────────────────────────────────────────────────────────

const REDACTED: &str = "[redacted]";

impl fmt::Debug for Person {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Person")
      .field("id", &self.id)
      .field("email", &self.email)
      .field("password", &REDACTED)
      .field("hobby", &self.hobby)
      .field("is_degenerate", &self.is_degenerate)
      .field("smart_car_color", &self.smart_car_color)
      .field("name", &self.name)
      .field("dob", &self.dob)
      .field("roles", &self.roles)
      .field("stats", &self.stats)
      .finish()
  }
}

impl fmt::Display for Person {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let id = self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
    let dob = self.dob.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let roles: Vec<&str> = self.roles.iter().map(|r| r.name.as_str()).collect();
    let stats = self.stats.to_json_string().map_err(|_| fmt::Error)?;
    write!(
      f,
      "Person(id={id}, email={}, password={REDACTED}, name={}, hobby={}, \
       isDegenerate={}, smartCarColor={}, dob={dob}, roles=[{}], stats={stats})",
      self.email,
      self.name,
      self.hobby,
      self.is_degenerate,
      self.smart_car_color,
      roles.join(", "),
    )
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::Months;
  use proptest::prelude::*;

  use super::*;
  use crate::role::RoleId;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn with_dob(dob: Option<NaiveDate>) -> Person {
    Person::from_api("a@b.co", "pw", "Ann", "Chess", "false", "Red", dob)
  }

  #[test]
  fn default_has_empty_collections_and_no_id() {
    let p = Person::new();
    assert!(p.id().is_none());
    assert!(p.roles().is_empty());
    assert!(p.stats().is_empty());
    assert!(p.dob().is_none());
  }

  #[test]
  fn from_api_leaves_id_roles_and_stats_empty() {
    let p = with_dob(Some(date(2000, 1, 1)));
    assert!(!p.is_persisted());
    assert!(p.roles().is_empty());
    assert!(p.stats().is_empty());
    assert_eq!(p.name(), "Ann");
    assert_eq!(p.dob(), Some(date(2000, 1, 1)));
  }

  #[test]
  fn age_without_dob_is_unknown() {
    assert_eq!(with_dob(None).age(), UNKNOWN_AGE);
    assert_eq!(with_dob(None).age_on(date(2024, 5, 1)), -1);
  }

  #[test]
  fn age_is_zero_on_day_of_birth() {
    let today = date(2024, 5, 1);
    assert_eq!(with_dob(Some(today)).age_on(today), 0);

    let now = Local::now().date_naive();
    assert_eq!(with_dob(Some(now)).age(), 0);
  }

  #[test]
  fn age_increments_on_birthday() {
    let p = with_dob(Some(date(1990, 6, 15)));
    assert_eq!(p.age_on(date(2020, 6, 14)), 29);
    assert_eq!(p.age_on(date(2020, 6, 15)), 30);
  }

  #[test]
  fn age_counts_whole_years_back_from_today() {
    let today = date(2024, 3, 10);
    for n in [0, 1, 17, 100, 184] {
      let dob = date(2024 - n, 3, 10);
      assert_eq!(with_dob(Some(dob)).age_on(today), n);
    }
  }

  #[test]
  fn leap_day_birthday_counts_on_march_first() {
    let p = with_dob(Some(date(2000, 2, 29)));
    assert_eq!(p.age_on(date(2001, 2, 28)), 0);
    assert_eq!(p.age_on(date(2001, 3, 1)), 1);
  }

  #[test]
  fn future_dob_is_not_clamped() {
    let today = date(2024, 5, 1);
    assert_eq!(with_dob(Some(date(2026, 5, 1))).age_on(today), -2);
    assert_eq!(with_dob(Some(date(2026, 8, 1))).age_on(today), -2);
    assert_eq!(with_dob(Some(date(2025, 1, 1))).age_on(today), 0);
  }

  #[test]
  fn assign_id_is_write_once() {
    let mut p = Person::new();
    p.assign_id(PersonId(7)).unwrap();
    p.assign_id(PersonId(7)).unwrap();
    assert!(matches!(
      p.assign_id(PersonId(8)),
      Err(Error::IdentityReassigned { current: PersonId(7), attempted: PersonId(8) })
    ));
    assert_eq!(p.id(), Some(PersonId(7)));
  }

  #[test]
  fn equality_is_by_identity() {
    let a = with_dob(None);
    let b = a.clone();
    assert_eq!(a, a);
    assert_ne!(a, b, "transient instances are distinct");

    let mut x = with_dob(None);
    let mut y = Person::new();
    x.assign_id(PersonId(3)).unwrap();
    y.assign_id(PersonId(3)).unwrap();
    assert_eq!(x, y);

    let set: HashSet<Person> = [x, y].into_iter().collect();
    assert_eq!(set.len(), 1);
  }

  #[test]
  fn adding_a_present_role_is_a_no_op() {
    let mut p = Person::new();
    let admin = Role::new(RoleId(1), "ROLE_ADMIN");
    assert!(p.add_role(admin.clone()));
    let before = p.roles().clone();
    assert!(!p.add_role(admin));
    assert_eq!(p.roles(), &before);
  }

  #[test]
  fn setters_are_idempotent() {
    let mut once = with_dob(None);
    once.set_hobby("Running");
    once.set_dob(Some(date(1999, 9, 9)));

    let mut twice = with_dob(None);
    twice.set_hobby("Running");
    twice.set_hobby("Running");
    twice.set_dob(Some(date(1999, 9, 9)));
    twice.set_dob(Some(date(1999, 9, 9)));

    assert_eq!(format!("{once:?}"), format!("{twice:?}"));
  }

  #[test]
  fn string_forms_redact_password() {
    let mut p = with_dob(Some(date(2001, 2, 3)));
    p.set_password("hunter2");
    p.add_role(Role::new(RoleId(1), "ROLE_USER"));
    p.stats_mut().record(date(2022, 11, 13), "steps", 8000);

    let display = p.to_string();
    let debug = format!("{p:?}");
    for s in [&display, &debug] {
      assert!(!s.contains("hunter2"), "{s}");
      assert!(s.contains(REDACTED), "{s}");
    }
    assert!(display.contains("email=a@b.co"));
    assert!(display.contains("dob=2001-02-03"));
    assert!(display.contains("roles=[ROLE_USER]"));
    assert!(display.contains(r#"stats={"2022-11-13":{"steps":8000}}"#), "{display}");
  }

  #[test]
  fn has_role_tracks_add_and_remove() {
    let mut p = Person::new();
    let user = Role::new(RoleId(1), "ROLE_USER");
    let admin = Role::new(RoleId(2), "ROLE_ADMIN");

    p.add_role(user.clone());
    assert!(p.has_role(&user));
    assert!(!p.has_role(&admin));
    assert!(p.has_role(&Role::new(RoleId(1), "stale name")));

    assert!(p.remove_role(&user));
    assert!(!p.has_role(&user));
    assert!(!p.remove_role(&user));
  }

  // ── Properties ──────────────────────────────────────────────────────────

  /// Civil dates across two centuries, with leap days drawn often.
  fn civil_date() -> impl Strategy<Value = NaiveDate> {
    prop_oneof![
      4 => (1900i32..2100, 1u32..=366)
        .prop_filter_map("valid ordinal", |(y, o)| NaiveDate::from_yo_opt(y, o)),
      1 => (475i32..525)
        .prop_filter_map("leap year", |k| NaiveDate::from_ymd_opt(k * 4, 2, 29)),
    ]
  }

  proptest! {
    #[test]
    fn age_counts_whole_years_for_any_today(today in civil_date(), n in 0u32..200) {
      // Feb 29 minus a non-multiple of four years lands on Feb 28.
      let dob = today.checked_sub_months(Months::new(12 * n)).unwrap();
      prop_assert_eq!(with_dob(Some(dob)).age_on(today), n as i32);
    }

    #[test]
    fn setting_twice_matches_setting_once(
      text in prop::collection::vec("\\PC{0,24}", 6),
      dob in prop::option::of(civil_date()),
    ) {
      let apply = |p: &mut Person| {
        p.set_email(text[0].as_str());
        p.set_password(text[1].as_str());
        p.set_name(text[2].as_str());
        p.set_hobby(text[3].as_str());
        p.set_is_degenerate(text[4].as_str());
        p.set_smart_car_color(text[5].as_str());
        p.set_dob(dob);
      };

      let mut once = Person::new();
      apply(&mut once);
      let mut twice = Person::new();
      apply(&mut twice);
      apply(&mut twice);

      prop_assert_eq!(format!("{once:?}"), format!("{twice:?}"));
      prop_assert_eq!(once.password(), twice.password());
    }

    #[test]
    fn adding_a_held_role_changes_nothing(
      ids in prop::collection::vec(0i64..40, 1..16),
      pick in any::<prop::sample::Index>(),
    ) {
      let mut p = Person::new();
      for id in &ids {
        p.add_role(Role::new(RoleId(*id), format!("ROLE_{id}")));
      }
      let before: Vec<(RoleId, String)> =
        p.roles().iter().map(|r| (r.id, r.name.clone())).collect();

      let id = ids[pick.index(ids.len())];
      prop_assert!(!p.add_role(Role::new(RoleId(id), "ROLE_AGAIN")));

      let after: Vec<(RoleId, String)> =
        p.roles().iter().map(|r| (r.id, r.name.clone())).collect();
      prop_assert_eq!(after, before);
    }
  }
}
