//! PostgreSQL-backed [`ArticleStore`] implementation.
//!
//! Every method is a single parameterized statement against the `articles`
//! and `tags` tables. No statement runs inside a transaction.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use article_api_core::models::{ArticleRecord, ArticleTag, NewArticle};
use article_api_core::store::ArticleStore;

/// PostgreSQL implementation of the [`ArticleStore`] trait.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<ArticleRecord> {
    Ok(ArticleRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        date: row.try_get("date")?,
        body: row.try_get("body")?,
    })
}

#[async_trait]
impl ArticleStore for PgStore {
    async fn fetch_article(&self, id: i32) -> Result<Option<ArticleRecord>> {
        let row = sqlx::query("SELECT id, title, date, body FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        let rows = sqlx::query("SELECT id, title, date, body FROM articles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO articles (title, date, body) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&article.title)
        .bind(article.date)
        .bind(&article.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_tag(&self, article_id: i32, tag: &str) -> Result<()> {
        sqlx::query("INSERT INTO tags (tag, article_id) VALUES ($1, $2)")
            .bind(tag)
            .bind(article_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn tags_for_article(&self, article_id: i32) -> Result<Vec<String>> {
        let tags: Vec<String> = sqlx::query_scalar("SELECT tag FROM tags WHERE article_id = $1")
            .bind(article_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn tag_rows_for_articles(&self, article_ids: &[i32]) -> Result<Vec<ArticleTag>> {
        let rows = sqlx::query("SELECT article_id, tag FROM tags WHERE article_id = ANY($1)")
            .bind(article_ids)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ArticleTag {
                    article_id: row.try_get("article_id")?,
                    tag: row.try_get("tag")?,
                })
            })
            .collect()
    }

    async fn article_ids_by_tag_and_date(&self, tag: &str, date: &str) -> Result<Vec<i32>> {
        // `date` is bound as text and cast server-side.
        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT a.id
            FROM articles a
            JOIN tags t ON a.id = t.article_id
            WHERE a.date = $1::date AND t.tag = $2
            ORDER BY a.id
            "#,
        )
        .bind(date)
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
