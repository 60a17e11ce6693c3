//! # postapp-store
//!
//! Local SQLite storage for PostApp.
//!
//! The crate exposes a synchronous [`Database`] handle wrapping a
//! `rusqlite::Connection`. The client uses its key-value table to persist
//! reading goal progress; the server uses its `posts` table as the hosted
//! post collection.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod posts;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
