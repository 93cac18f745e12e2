//! SQLite persistence for finalized trades.
//!
//! - `store`: opening the database and applying the schema
//! - `repo`: reading and writing stored trade documents

pub mod repo;
pub mod store;

pub use repo::{Repository, StoredTrade};
pub use store::init_db;
