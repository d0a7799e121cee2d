//! Fixed sample people used to bootstrap an empty store.

use chrono::NaiveDate;

use crate::person::Person;

/// Seed dates are written month first.
const SEED_DATE_FORMAT: &str = "%m-%d-%Y";

/// The three sample people, in a stable order.
///
/// A seed date that fails to parse leaves that person's `dob` unset.
pub fn init() -> [Person; 3] {
  let mut haseeb = Person::new();
  haseeb.set_name("Haseeb Beg");
  haseeb.set_email("animeLover69@gmail.com");
  haseeb.set_password("password");
  haseeb.set_hobby("Anime Watching");
  haseeb.set_is_degenerate("true");
  haseeb.set_smart_car_color("Yellow");
  haseeb.set_dob(parse_seed_date("01-01-1840"));

  let mut tirth = Person::new();
  tirth.set_name("Tirth Thakkar");
  tirth.set_email("tirth@gmail.com");
  tirth.set_password("password");
  tirth.set_hobby("Sleeping");
  tirth.set_is_degenerate("false");
  tirth.set_smart_car_color("Pink");
  tirth.set_dob(parse_seed_date("01-01-1845"));

  let mut test = Person::new();
  test.set_name("Test");
  test.set_email("testing@email.com");
  test.set_password("password");
  test.set_hobby("Testing");
  test.set_is_degenerate("maybe");
  test.set_smart_car_color("Blue");

  [haseeb, tirth, test]
}

fn parse_seed_date(s: &str) -> Option<NaiveDate> {
  match NaiveDate::parse_from_str(s, SEED_DATE_FORMAT) {
    Ok(date) => Some(date),
    Err(e) => {
      tracing::debug!(input = s, error = %e, "ignoring unparseable seed date");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::UNKNOWN_AGE;

  #[test]
  fn seeds_three_valid_people_in_order() {
    let people = init();
    let names: Vec<&str> = people.iter().map(Person::name).collect();
    assert_eq!(names, ["Haseeb Beg", "Tirth Thakkar", "Test"]);

    for p in &people {
      assert!(p.validate().is_ok(), "{p} should validate");
      assert!(p.id().is_none());
      assert!(p.roles().is_empty());
      assert!(p.stats().is_empty());
    }
  }

  #[test]
  fn haseeb_fields() {
    let [haseeb, _, _] = init();
    assert_eq!(haseeb.email(), "animeLover69@gmail.com");
    assert_eq!(haseeb.hobby(), "Anime Watching");
    assert_eq!(haseeb.is_degenerate(), "true");
    assert_eq!(haseeb.smart_car_color(), "Yellow");
    assert_eq!(haseeb.dob(), NaiveDate::from_ymd_opt(1840, 1, 1));
    assert!(haseeb.age() >= 180);
  }

  #[test]
  fn tirth_fields() {
    let [_, tirth, _] = init();
    assert_eq!(tirth.email(), "tirth@gmail.com");
    assert_eq!(tirth.hobby(), "Sleeping");
    assert_eq!(tirth.is_degenerate(), "false");
    assert_eq!(tirth.smart_car_color(), "Pink");
    assert_eq!(tirth.dob(), NaiveDate::from_ymd_opt(1845, 1, 1));
    assert!(tirth.age() >= 175);
  }

  #[test]
  fn test_person_has_no_dob() {
    let [_, _, test] = init();
    assert_eq!(test.email(), "testing@email.com");
    assert_eq!(test.is_degenerate(), "maybe");
    assert_eq!(test.smart_car_color(), "Blue");
    assert_eq!(test.age(), UNKNOWN_AGE);
  }

  #[test]
  fn bad_seed_date_is_swallowed() {
    assert_eq!(parse_seed_date("1840-01-01"), None);
    assert_eq!(parse_seed_date("13-01-1840"), None);
  }
}
