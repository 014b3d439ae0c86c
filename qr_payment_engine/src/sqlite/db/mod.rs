//! # SQLite database methods
//!
//! "Low-level" SQLite interactions live here, as plain functions that accept a `&mut SqliteConnection`. Callers can
//! hand in a pooled connection, or a transaction via `&mut *tx`, without any other changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod payments;

const SQLITE_DB_URL: &str = "sqlite://data/qpg_store.db";

pub fn db_url() -> String {
    let result = env::var("QPG_DATABASE_URL").unwrap_or_else(|_| {
        info!("QPG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
