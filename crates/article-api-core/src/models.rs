//! Core data models for articles, tag associations, and summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A fully hydrated article, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub body: String,
    /// Tags in insertion order. Not guaranteed unique.
    pub tags: Vec<String>,
}

impl Article {
    pub fn from_record(record: ArticleRecord, tags: Vec<String>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            date: record.date,
            body: record.body,
            tags,
        }
    }
}

/// Client payload for creating an article. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub date: NaiveDate,
    pub body: String,
    /// Absent or `null` both mean no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A row of the `articles` table, without its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub body: String,
}

/// A row of the `tags` table: one tag attached to one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTag {
    pub article_id: i32,
    pub tag: String,
}

/// Derived summary of the articles carrying `tag` on a given date.
///
/// Never persisted. `articles` holds at most
/// [`MAX_SUMMARY_ARTICLES`](crate::summary::MAX_SUMMARY_ARTICLES) ids while
/// `count` is the full number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDateSummary {
    pub tag: String,
    pub count: usize,
    pub articles: Vec<i32>,
    pub related_tags: Vec<String>,
}

impl TagDateSummary {
    /// Summary with no matches, echoing the queried tag.
    pub fn empty(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            count: 0,
            articles: Vec::new(),
            related_tags: Vec::new(),
        }
    }
}
