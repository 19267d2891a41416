//! In-memory [`ArticleStore`] implementation for tests and local runs.
//!
//! Uses a `BTreeMap` of article rows and a `Vec` of tag rows behind
//! `std::sync::RwLock`. Ids are assigned sequentially from 1, like a
//! `serial` column. Tag rows keep insertion order.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{ArticleRecord, ArticleTag, NewArticle};

use super::ArticleStore;

#[derive(Default)]
struct Tables {
    articles: BTreeMap<i32, ArticleRecord>,
    tags: Vec<ArticleTag>,
    last_id: i32,
}

/// In-memory store for tests and local runs without PostgreSQL.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    /// Delete an article and, by cascade, its tag rows.
    ///
    /// Returns whether a row was removed.
    pub fn delete_article(&self, id: i32) -> Result<bool> {
        let mut tables = self.write()?;
        let removed = tables.articles.remove(&id).is_some();
        tables.tags.retain(|t| t.article_id != id);
        Ok(removed)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn fetch_article(&self, id: i32) -> Result<Option<ArticleRecord>> {
        Ok(self.read()?.articles.get(&id).cloned())
    }

    async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self.read()?.articles.values().cloned().collect())
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i32> {
        let mut tables = self.write()?;
        tables.last_id += 1;
        let id = tables.last_id;
        tables.articles.insert(
            id,
            ArticleRecord {
                id,
                title: article.title.clone(),
                date: article.date,
                body: article.body.clone(),
            },
        );
        Ok(id)
    }

    async fn insert_tag(&self, article_id: i32, tag: &str) -> Result<()> {
        let mut tables = self.write()?;
        if !tables.articles.contains_key(&article_id) {
            bail!(
                "insert into tags violates foreign key: article {} does not exist",
                article_id
            );
        }
        tables.tags.push(ArticleTag {
            article_id,
            tag: tag.to_string(),
        });
        Ok(())
    }

    async fn tags_for_article(&self, article_id: i32) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .tags
            .iter()
            .filter(|t| t.article_id == article_id)
            .map(|t| t.tag.clone())
            .collect())
    }

    async fn tag_rows_for_articles(&self, article_ids: &[i32]) -> Result<Vec<ArticleTag>> {
        Ok(self
            .read()?
            .tags
            .iter()
            .filter(|t| article_ids.contains(&t.article_id))
            .cloned()
            .collect())
    }

    async fn article_ids_by_tag_and_date(&self, tag: &str, date: &str) -> Result<Vec<i32>> {
        let date = NaiveDate::from_str(date)
            .map_err(|e| anyhow!("invalid input syntax for type date: {:?}: {}", date, e))?;
        let tables = self.read()?;
        let mut ids = Vec::new();
        for article in tables.articles.values().filter(|a| a.date == date) {
            let matches = tables
                .tags
                .iter()
                .filter(|t| t.article_id == article.id && t.tag == tag)
                .count();
            ids.extend(std::iter::repeat(article.id).take(matches));
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_article(date: &str) -> NewArticle {
        NewArticle {
            title: "title".to_string(),
            date: NaiveDate::from_str(date).unwrap(),
            body: "body".to_string(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let store = InMemoryStore::new();
        assert_eq!(store.insert_article(&new_article("2018-01-01")).await.unwrap(), 1);
        assert_eq!(store.insert_article(&new_article("2018-01-01")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_tag_requires_article() {
        let store = InMemoryStore::new();
        assert!(store.insert_tag(42, "x").await.is_err());
    }

    #[tokio::test]
    async fn test_join_keeps_duplicate_tag_rows() {
        let store = InMemoryStore::new();
        let id = store.insert_article(&new_article("2018-01-01")).await.unwrap();
        store.insert_tag(id, "x").await.unwrap();
        store.insert_tag(id, "x").await.unwrap();
        let ids = store
            .article_ids_by_tag_and_date("x", "2018-01-01")
            .await
            .unwrap();
        assert_eq!(ids, vec![id, id]);
    }

    #[tokio::test]
    async fn test_join_rejects_unparseable_date() {
        let store = InMemoryStore::new();
        assert!(store
            .article_ids_by_tag_and_date("x", "not-a-date")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_tags() {
        let store = InMemoryStore::new();
        let id = store.insert_article(&new_article("2018-01-01")).await.unwrap();
        store.insert_tag(id, "x").await.unwrap();
        assert!(store.delete_article(id).unwrap());
        assert!(store.tags_for_article(id).await.unwrap().is_empty());
        assert!(store.fetch_article(id).await.unwrap().is_none());
    }
}
