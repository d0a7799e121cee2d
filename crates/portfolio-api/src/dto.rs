//! Request and response payload shapes.
//!
//! Inbound payloads bind every field as optional so that missing fields are
//! reported as validation errors rather than as deserialisation failures.

use chrono::NaiveDate;
use portfolio_core::{Person, PersonId, Role, Stats, validate::ValidationErrors};
use serde::{Deserialize, Deserializer, Serialize};

/// Wire format of `dob`.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Body of `POST /people`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBody {
  pub email:           Option<String>,
  pub password:        Option<String>,
  pub name:            Option<String>,
  pub hobby:           Option<String>,
  pub is_degenerate:   Option<String>,
  pub smart_car_color: Option<String>,
  pub dob:             Option<String>,
}

impl PersonBody {
  /// Bind into a transient [`Person`], collecting binding errors (missing
  /// `name`, malformed `dob`) into `errors`.
  pub fn bind(self, errors: &mut ValidationErrors) -> Person {
    if self.name.is_none() {
      errors.push("name", "must not be null");
    }
    let dob = self.dob.as_deref().and_then(|s| parse_dob(s, errors));

    Person::from_api(
      self.email.unwrap_or_default(),
      self.password.unwrap_or_default(),
      self.name.unwrap_or_default(),
      self.hobby.unwrap_or_default(),
      self.is_degenerate.unwrap_or_default(),
      self.smart_car_color.unwrap_or_default(),
      dob,
    )
  }
}

/// Body of `PATCH /people/{id}`. Absent keys leave the attribute untouched;
/// `"dob": null` clears the date of birth.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
  pub email:           Option<String>,
  pub password:        Option<String>,
  pub name:            Option<String>,
  pub hobby:           Option<String>,
  pub is_degenerate:   Option<String>,
  pub smart_car_color: Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub dob:             Option<Option<String>>,
}

impl PersonPatch {
  /// Apply the present keys to `person`. Returns whether a new password was
  /// supplied.
  pub fn apply(self, person: &mut Person, errors: &mut ValidationErrors) -> bool {
    if let Some(v) = self.email {
      person.set_email(v);
    }
    if let Some(v) = self.name {
      person.set_name(v);
    }
    if let Some(v) = self.hobby {
      person.set_hobby(v);
    }
    if let Some(v) = self.is_degenerate {
      person.set_is_degenerate(v);
    }
    if let Some(v) = self.smart_car_color {
      person.set_smart_car_color(v);
    }
    match self.dob {
      Some(Some(s)) => {
        if let Some(dob) = parse_dob(&s, errors) {
          person.set_dob(Some(dob));
        }
      }
      Some(None) => person.set_dob(None),
      None => {}
    }
    match self.password {
      Some(v) => {
        person.set_password(v);
        true
      }
      None => false,
    }
  }
}

/// Distinguishes `"key": null` from an absent key.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  T::deserialize(deserializer).map(Some)
}

fn parse_dob(s: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
  match NaiveDate::parse_from_str(s, DOB_FORMAT) {
    Ok(d) => Some(d),
    Err(_) => {
      errors.push("dob", "must be a date formatted yyyy-MM-dd");
      None
    }
  }
}

/// Emitted shape of a person. The password is never included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
  pub id:              Option<PersonId>,
  pub email:           String,
  pub name:            String,
  pub hobby:           String,
  pub is_degenerate:   String,
  pub smart_car_color: String,
  pub dob:             Option<NaiveDate>,
  /// Whole years since `dob`, or -1 if unknown.
  pub age:             i32,
  pub roles:           Vec<Role>,
  pub stats:           Stats,
}

impl From<&Person> for PersonResponse {
  fn from(p: &Person) -> Self {
    Self {
      id:              p.id(),
      email:           p.email().to_owned(),
      name:            p.name().to_owned(),
      hobby:           p.hobby().to_owned(),
      is_degenerate:   p.is_degenerate().to_owned(),
      smart_car_color: p.smart_car_color().to_owned(),
      dob:             p.dob(),
      age:             p.age(),
      roles:           p.roles().iter().cloned().collect(),
      stats:           p.stats().clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn bind_reports_missing_name_and_bad_dob() {
    let body: PersonBody = serde_json::from_value(json!({
      "email": "x@y.io",
      "dob": "01-01-1840",
    }))
    .unwrap();

    let mut errors = ValidationErrors::new();
    let person = body.bind(&mut errors);
    assert_eq!(errors.for_field("name").collect::<Vec<_>>(), ["must not be null"]);
    assert_eq!(errors.for_field("dob").count(), 1);
    assert!(person.dob().is_none());
  }

  #[test]
  fn bind_reads_camel_case_keys() {
    let body: PersonBody = serde_json::from_value(json!({
      "email": "tirth@gmail.com",
      "password": "password",
      "name": "Tirth Thakkar",
      "hobby": "Sleeping",
      "isDegenerate": "false",
      "smartCarColor": "Pink",
      "dob": "1845-01-01",
    }))
    .unwrap();

    let mut errors = ValidationErrors::new();
    let person = body.bind(&mut errors);
    assert!(errors.is_empty());
    assert_eq!(person.is_degenerate(), "false");
    assert_eq!(person.smart_car_color(), "Pink");
    assert_eq!(person.dob(), NaiveDate::from_ymd_opt(1845, 1, 1));
  }

  #[test]
  fn patch_distinguishes_null_from_absent_dob() {
    let mut person = Person::new();
    person.set_dob(NaiveDate::from_ymd_opt(2000, 1, 1));
    let mut errors = ValidationErrors::new();

    let absent: PersonPatch = serde_json::from_value(json!({ "hobby": "Chess" })).unwrap();
    assert!(!absent.apply(&mut person, &mut errors));
    assert_eq!(person.hobby(), "Chess");
    assert!(person.dob().is_some());

    let cleared: PersonPatch = serde_json::from_value(json!({ "dob": null })).unwrap();
    cleared.apply(&mut person, &mut errors);
    assert!(person.dob().is_none());
    assert!(errors.is_empty());
  }

  #[test]
  fn response_uses_camel_case_and_omits_password() {
    let mut person = Person::from_api(
      "testing@email.com",
      "secret-hash",
      "Test",
      "Testing",
      "maybe",
      "Blue",
      None,
    );
    person.assign_id(PersonId(3)).unwrap();

    let value = serde_json::to_value(PersonResponse::from(&person)).unwrap();
    assert_eq!(value["id"], json!(3));
    assert_eq!(value["isDegenerate"], json!("maybe"));
    assert_eq!(value["smartCarColor"], json!("Blue"));
    assert_eq!(value["age"], json!(-1));
    assert_eq!(value["dob"], json!(null));
    assert_eq!(value["roles"], json!([]));
    assert_eq!(value["stats"], json!({}));
    assert!(value.get("password").is_none());
    assert!(!value.to_string().contains("secret-hash"));
  }
}
