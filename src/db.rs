//! PostgreSQL connection management.
//!
//! Provides the connection pool shared by every request handler for the
//! lifetime of the process. Connections are reused across requests.

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::Config;

/// Create a connection pool to the configured PostgreSQL database.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let db = &config.db;

    let options = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(&db.name);

    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database '{}' at {}:{}",
                db.name, db.host, db.port
            )
        })?;

    Ok(pool)
}
