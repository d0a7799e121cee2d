//! The SQLite implementation of [`PersonStore`].

use std::path::Path;

use portfolio_core::{
  Person, PersonId, Role, RoleId,
  store::PersonStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{PersonRow, RawPerson, RawRole},
  schema::SCHEMA,
};

const PERSON_COLUMNS: &str =
  "id, email, password, hobby, is_degenerate, smart_car_color, name, dob, stats";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Clones share one background connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What a `save` transaction decided, before error mapping.
enum SaveOutcome {
  Saved(i64),
  Missing(i64),
  UnknownRole(i64),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a throwaway in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch people matching `where_clause` with their roles, in one call.
  async fn query_people(
    &self,
    where_clause: &'static str,
    param: Option<rusqlite::types::Value>,
  ) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM person {where_clause} ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let params = rusqlite::params_from_iter(param.iter());
        let mut rows = stmt
          .query_map(params, read_person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        for raw in &mut rows {
          raw.roles = load_roles(conn, raw.id)?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn query_role(
    &self,
    where_clause: &'static str,
    param: rusqlite::types::Value,
  ) -> Result<Option<Role>> {
    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT id, name FROM role {where_clause}");
        Ok(
          conn
            .query_row(&sql, [param], |row| {
              Ok(RawRole { id: row.get(0)?, name: row.get(1)? })
            })
            .optional()?,
        )
      })
      .await?;
    Ok(raw.map(RawRole::into_role))
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn read_person_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id:    row.get(0)?,
    row:   PersonRow {
      email:           row.get(1)?,
      password:        row.get(2)?,
      hobby:           row.get(3)?,
      is_degenerate:   row.get(4)?,
      smart_car_color: row.get(5)?,
      name:            row.get(6)?,
      dob:             row.get(7)?,
      stats:           row.get(8)?,
    },
    roles: Vec::new(),
  })
}

fn load_roles(
  conn: &rusqlite::Connection,
  person_id: i64,
) -> rusqlite::Result<Vec<RawRole>> {
  let mut stmt = conn.prepare_cached(
    "SELECT r.id, r.name
     FROM role r
     JOIN person_roles pr ON pr.role_id = r.id
     WHERE pr.person_id = ?1
     ORDER BY r.id",
  )?;
  stmt
    .query_map([person_id], |row| {
      Ok(RawRole { id: row.get(0)?, name: row.get(1)? })
    })?
    .collect()
}

/// Whether `err` is a UNIQUE constraint violation.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  // ── Roles ─────────────────────────────────────────────────────────────────

  async fn create_role(&self, name: String) -> Result<Role> {
    let name_param = name.clone();
    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO role (name) VALUES (?1)", [&name_param])?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateRole(name.clone())
        } else {
          Error::Database(e)
        }
      })?;

    Ok(Role::new(RoleId(id), name))
  }

  async fn get_role(&self, id: RoleId) -> Result<Option<Role>> {
    self.query_role("WHERE id = ?1", id.0.into()).await
  }

  async fn find_role_by_name(&self, name: String) -> Result<Option<Role>> {
    self.query_role("WHERE name = ?1", name.into()).await
  }

  async fn list_roles(&self) -> Result<Vec<Role>> {
    let raws: Vec<RawRole> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM role ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| Ok(RawRole { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawRole::into_role).collect())
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn save<'a>(&'a self, person: &'a Person) -> Result<Person> {
    let row      = PersonRow::from_person(person)?;
    let role_ids = person.roles().iter().map(|r| r.id.0).collect::<Vec<_>>();
    let existing = person.id().map(|id| id.0);
    let email    = row.email.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let id = match existing {
          None => {
            tx.execute(
              "INSERT INTO person (
                 email, password, hobby, is_degenerate, smart_car_color,
                 name, dob, stats
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
              rusqlite::params![
                row.email,
                row.password,
                row.hobby,
                row.is_degenerate,
                row.smart_car_color,
                row.name,
                row.dob,
                row.stats,
              ],
            )?;
            tx.last_insert_rowid()
          }
          Some(id) => {
            let updated = tx.execute(
              "UPDATE person SET
                 email = ?1, password = ?2, hobby = ?3, is_degenerate = ?4,
                 smart_car_color = ?5, name = ?6, dob = ?7, stats = ?8
               WHERE id = ?9",
              rusqlite::params![
                row.email,
                row.password,
                row.hobby,
                row.is_degenerate,
                row.smart_car_color,
                row.name,
                row.dob,
                row.stats,
                id,
              ],
            )?;
            if updated == 0 {
              return Ok(SaveOutcome::Missing(id));
            }
            tx.execute("DELETE FROM person_roles WHERE person_id = ?1", [id])?;
            id
          }
        };

        for role_id in role_ids {
          let known = tx
            .query_row("SELECT 1 FROM role WHERE id = ?1", [role_id], |_| Ok(()))
            .optional()?
            .is_some();
          if !known {
            // Dropping `tx` rolls back the person row as well.
            return Ok(SaveOutcome::UnknownRole(role_id));
          }
          tx.execute(
            "INSERT INTO person_roles (person_id, role_id) VALUES (?1, ?2)",
            [id, role_id],
          )?;
        }

        tx.commit()?;
        Ok(SaveOutcome::Saved(id))
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateEmail(email)
        } else {
          Error::Database(e)
        }
      })?;

    match outcome {
      SaveOutcome::Saved(id) => {
        let mut saved = person.clone();
        saved.assign_id(PersonId(id))?;
        Ok(saved)
      }
      SaveOutcome::Missing(id) => Err(Error::PersonNotFound(PersonId(id))),
      SaveOutcome::UnknownRole(id) => Err(Error::RoleNotFound(RoleId(id))),
    }
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let mut people = self.query_people("WHERE id = ?1", Some(id.0.into())).await?;
    Ok(people.pop())
  }

  async fn find_by_email(&self, email: String) -> Result<Option<Person>> {
    let mut people = self.query_people("WHERE email = ?1", Some(email.into())).await?;
    Ok(people.pop())
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    self.query_people("", None).await
  }

  async fn delete_person(&self, id: PersonId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM person WHERE id = ?1", [id.0])?))
      .await?;
    Ok(deleted > 0)
  }
}
