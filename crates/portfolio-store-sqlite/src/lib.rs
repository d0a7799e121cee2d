//! SQLite backend for the portfolio person store.
//!
//! Every query runs inside [`tokio_rusqlite::Connection::call`], off the async
//! runtime's worker threads.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
