//! Field-level validation rules for [`Person`].
//!
//! [`PERSON_RULES`] is the single declaration of every constraint the binding
//! layer enforces before a person is persisted. Checks never stop at the
//! first failure; every breached constraint is reported.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::person::Person;

/// Message reported when `name` is outside its allowed length.
pub const NAME_LENGTH_MESSAGE: &str = "Name (2 to 30 chars)";

// local-part: a dot-atom (non-ASCII allowed) or a quoted string.
// domain: dot-separated labels in any script, or a bracketed IP literal.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(concat!(
    r"^(?:",
    r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{10FFFF}-]+",
    r"(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{10FFFF}-]+)*",
    r#"|"(?:[^"\\\r\n]|\\.)*""#,
    r")@(?:",
    r"[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?",
    r"(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?)*",
    r"|\[(?:[0-9]{1,3}(?:\.[0-9]{1,3}){3}|IPv6:[0-9A-Fa-f:.]+)\]",
    r")$",
  ))
  .expect("email regex compiles")
});

/// Whether `s` is syntactically an email address.
pub fn is_valid_email(s: &str) -> bool { EMAIL_RE.is_match(s) }

// ─── Constraints ─────────────────────────────────────────────────────────────

/// A single predicate over a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
  /// At least one character.
  NotEmpty,
  /// At least `n` characters.
  MinLength(usize),
  /// Between `min` and `max` characters inclusive.
  Length {
    min:     usize,
    max:     usize,
    message: &'static str,
  },
  /// Email syntax. Empty values pass; pair with `NotEmpty`.
  Email,
}

impl Constraint {
  /// Returns the violation message, or `None` if `value` satisfies the
  /// constraint. Lengths count Unicode scalar values.
  pub fn check(&self, value: &str) -> Option<String> {
    let len = value.chars().count();
    match *self {
      Self::NotEmpty if len == 0 => Some("must not be empty".into()),
      Self::MinLength(n) if len < n => {
        Some(format!("size must be at least {n}"))
      }
      Self::Length { min, max, message } if len < min || len > max => {
        Some(message.into())
      }
      Self::Email if len > 0 && !is_valid_email(value) => {
        Some("must be a well-formed email address".into())
      }
      _ => None,
    }
  }
}

/// The constraints attached to one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
  /// Field name as it appears in API payloads.
  pub field:       &'static str,
  pub constraints: &'static [Constraint],
}

pub const PERSON_RULES: &[FieldRule] = &[
  FieldRule {
    field:       "email",
    constraints: &[
      Constraint::NotEmpty,
      Constraint::MinLength(5),
      Constraint::Email,
    ],
  },
  FieldRule { field: "password", constraints: &[Constraint::NotEmpty] },
  FieldRule { field: "hobby", constraints: &[Constraint::NotEmpty] },
  FieldRule { field: "isDegenerate", constraints: &[Constraint::NotEmpty] },
  FieldRule { field: "smartCarColor", constraints: &[Constraint::NotEmpty] },
  FieldRule {
    field:       "name",
    constraints: &[Constraint::Length {
      min:     2,
      max:     30,
      message: NAME_LENGTH_MESSAGE,
    }],
  },
];

// ─── Errors ──────────────────────────────────────────────────────────────────

/// One breached constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

/// Every constraint breached by a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError { field, message: message.into() });
  }

  /// Append every error from `other`.
  pub fn merge(&mut self, other: ValidationErrors) { self.0.extend(other.0); }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

  /// Messages reported against `field`.
  pub fn for_field<'a>(
    &'a self,
    field: &'a str,
  ) -> impl Iterator<Item = &'a str> + 'a {
    self
      .0
      .iter()
      .filter(move |e| e.field == field)
      .map(|e| e.message.as_str())
  }

  /// `Ok(())` if nothing was recorded.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Run every rule in [`PERSON_RULES`] against `person`.
pub fn validate_person(person: &Person) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::new();
  for rule in PERSON_RULES {
    let value = person.field_text(rule.field).unwrap_or_default();
    for constraint in rule.constraints {
      if let Some(message) = constraint.check(value) {
        errors.push(rule.field, message);
      }
    }
  }
  errors.into_result()
}
