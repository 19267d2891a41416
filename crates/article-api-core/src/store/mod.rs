//! Storage abstraction for Article API.
//!
//! The [`ArticleStore`] trait is the minimal query interface consumed by the
//! article repository and the summary engine. It mirrors the two relations
//! of the schema (`articles` and `tags`) and enables pluggable backends
//! (PostgreSQL in the application crate, [`memory::InMemoryStore`] here).
//!
//! Implementations must be `Send + Sync` to be shared across request
//! handlers.

pub mod memory;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ArticleRecord, ArticleTag, NewArticle};

/// Abstract storage backend for articles and their tags.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch_article`](ArticleStore::fetch_article) | One `articles` row by id |
/// | [`list_articles`](ArticleStore::list_articles) | Every `articles` row, ordered by id |
/// | [`insert_article`](ArticleStore::insert_article) | Insert a row, returning the assigned id |
/// | [`insert_tag`](ArticleStore::insert_tag) | Insert one tag association |
/// | [`tags_for_article`](ArticleStore::tags_for_article) | Tags of one article, store order |
/// | [`tag_rows_for_articles`](ArticleStore::tag_rows_for_articles) | Tag rows of many articles in one fetch |
/// | [`article_ids_by_tag_and_date`](ArticleStore::article_ids_by_tag_and_date) | Join of articles and tags on `(tag, date)` |
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fetch the article row for `id`, or `None` when no row matches.
    async fn fetch_article(&self, id: i32) -> Result<Option<ArticleRecord>>;

    /// Fetch every article row.
    async fn list_articles(&self) -> Result<Vec<ArticleRecord>>;

    /// Insert an article row (tags are not written) and return its id.
    async fn insert_article(&self, article: &NewArticle) -> Result<i32>;

    /// Attach `tag` to the article `article_id`.
    async fn insert_tag(&self, article_id: i32, tag: &str) -> Result<()>;

    /// All tags of one article, in the order the store returns them.
    async fn tags_for_article(&self, article_id: i32) -> Result<Vec<String>>;

    /// All tag rows belonging to any of `article_ids`.
    ///
    /// Rows of the same article keep their relative store order; rows of
    /// different articles may be interleaved.
    async fn tag_rows_for_articles(&self, article_ids: &[i32]) -> Result<Vec<ArticleTag>>;

    /// Ids of articles dated `date` that carry `tag`, one entry per matching
    /// tag row.
    ///
    /// `date` is passed through unvalidated; a value the backend cannot
    /// interpret as a date is a storage error.
    async fn article_ids_by_tag_and_date(&self, tag: &str, date: &str) -> Result<Vec<i32>>;
}

/// Group tag rows by article id, preserving per-article order.
pub fn group_tags(rows: Vec<ArticleTag>) -> HashMap<i32, Vec<String>> {
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.article_id).or_default().push(row.tag);
    }
    grouped
}
