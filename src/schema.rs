//! Table creation for a fresh database.
//!
//! Both statements are idempotent (`IF NOT EXISTS`); there is no schema
//! versioning.

use anyhow::Result;
use sqlx::PgPool;

use crate::config::Config;
use crate::db;

/// Create the `articles` and `tags` tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            date DATE NOT NULL,
            body TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            tag TEXT,
            article_id INT,
            CONSTRAINT fk_articles FOREIGN KEY (article_id)
                REFERENCES articles(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize the schema from the configured database (`article-api init`).
pub async fn run_init(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    ensure_schema(&pool).await?;
    pool.close().await;

    tracing::info!(database = %config.db.name, "schema initialized");
    Ok(())
}
