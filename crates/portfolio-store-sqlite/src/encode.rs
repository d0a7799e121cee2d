//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings. The stats document is stored as
//! compact JSON text.

use chrono::NaiveDate;
use portfolio_core::{Person, PersonId, Role, RoleId, Stats};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn encode_stats(stats: &Stats) -> Result<String> { Ok(stats.to_json_string()?) }

pub fn decode_stats(s: &str) -> Result<Stats> { Ok(Stats::from_json_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values of a `person` row, ready to bind.
pub struct PersonRow {
  pub email:           String,
  pub password:        String,
  pub hobby:           String,
  pub is_degenerate:   String,
  pub smart_car_color: String,
  pub name:            String,
  pub dob:             Option<String>,
  pub stats:           String,
}

impl PersonRow {
  pub fn from_person(p: &Person) -> Result<Self> {
    Ok(Self {
      email:           p.email().to_owned(),
      password:        p.password().to_owned(),
      hobby:           p.hobby().to_owned(),
      is_degenerate:   p.is_degenerate().to_owned(),
      smart_car_color: p.smart_car_color().to_owned(),
      name:            p.name().to_owned(),
      dob:             p.dob().map(encode_date),
      stats:           encode_stats(p.stats())?,
    })
  }
}

/// Raw values read from a `role` row.
pub struct RawRole {
  pub id:   i64,
  pub name: String,
}

impl RawRole {
  pub fn into_role(self) -> Role { Role::new(RoleId(self.id), self.name) }
}

/// Raw values read from a `person` row plus its joined roles.
pub struct RawPerson {
  pub id:    i64,
  pub row:   PersonRow,
  pub roles: Vec<RawRole>,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    let RawPerson { id, row, roles } = self;
    let dob = row.dob.as_deref().map(decode_date).transpose()?;

    let mut person = Person::from_api(
      row.email,
      row.password,
      row.name,
      row.hobby,
      row.is_degenerate,
      row.smart_car_color,
      dob,
    );
    person.assign_id(PersonId(id))?;
    person.set_stats(decode_stats(&row.stats)?);
    person.set_roles(roles.into_iter().map(RawRole::into_role));
    Ok(person)
  }
}
