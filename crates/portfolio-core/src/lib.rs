//! Core types for the portfolio person registry.
//!
//! [`Person`] and [`Role`] carry the domain model, [`validate`] declares the
//! field rules checked before persistence, and [`store::PersonStore`] is the
//! seam every storage backend implements. Nothing here knows about HTTP or
//! SQL.

pub mod error;
pub mod person;
pub mod role;
pub mod seed;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use person::{Person, PersonId};
pub use role::{Role, RoleId};
pub use stats::Stats;
