//! SQLite persistence for game aggregates.

mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use repository::{MIGRATIONS, SqliteStore};
