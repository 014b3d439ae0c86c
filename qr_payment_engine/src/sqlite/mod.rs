//! SQLite backend for the payment store.
mod sqlite_impl;

pub mod db;

pub use sqlite_impl::SqliteStore;
