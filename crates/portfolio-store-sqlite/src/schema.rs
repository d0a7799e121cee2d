//! SQL schema for the portfolio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS role (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS person (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    email            TEXT NOT NULL UNIQUE,
    password         TEXT NOT NULL,
    hobby            TEXT NOT NULL,
    is_degenerate    TEXT NOT NULL,
    smart_car_color  TEXT NOT NULL,
    name             TEXT NOT NULL,
    dob              TEXT,                        -- YYYY-MM-DD or NULL
    stats            TEXT NOT NULL DEFAULT '{}'   -- JSON document keyed by date
                     CHECK (json_valid(stats))
);

-- Removing a person drops its associations; roles are shared and survive.
CREATE TABLE IF NOT EXISTS person_roles (
    person_id  INTEGER NOT NULL REFERENCES person(id) ON DELETE CASCADE,
    role_id    INTEGER NOT NULL REFERENCES role(id),
    PRIMARY KEY (person_id, role_id)
);

CREATE INDEX IF NOT EXISTS person_roles_role_idx ON person_roles(role_id);

PRAGMA user_version = 1;
";
