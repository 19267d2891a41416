//! Tag/date summary engine.
//!
//! Given a tag and a date, computes how many articles carry the tag on that
//! date, the first few of their ids, and the other tags seen on those
//! articles. The engine only reads through the [`ArticleStore`] trait.
//!
//! # Algorithm
//!
//! 1. Fetch every article id where `articles.date = date` and a `tags` row
//!    with `tag` exists (inner join; one entry per matching tag row).
//! 2. `count` is the number of match rows, unbounded.
//! 3. `articles` is the first [`MAX_SUMMARY_ARTICLES`] match ids, in store
//!    order.
//! 4. Tags of the capped ids are fetched in one batch. Walking the capped
//!    ids in order, and each article's tags in store order, every tag not
//!    yet seen is appended to `related_tags`, except the queried tag.
//!
//! Related tags are drawn from the capped ids only: a tag that appears only
//! on the eleventh match is not reported.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::models::TagDateSummary;
use crate::store::{group_tags, ArticleStore};

/// Upper bound on the ids listed in [`TagDateSummary::articles`].
pub const MAX_SUMMARY_ARTICLES: usize = 10;

/// Compute the [`TagDateSummary`] for `(tag, date)`.
///
/// `date` is handed to the store as-is. Any store failure fails the whole
/// call; nothing partial is returned.
pub async fn summarize<S: ArticleStore + ?Sized>(
    store: &S,
    tag: &str,
    date: &str,
) -> Result<TagDateSummary> {
    let matches = store.article_ids_by_tag_and_date(tag, date).await?;
    let count = matches.len();
    let articles: Vec<i32> = matches.into_iter().take(MAX_SUMMARY_ARTICLES).collect();

    let related_tags = if articles.is_empty() {
        Vec::new()
    } else {
        let rows = store.tag_rows_for_articles(&articles).await?;
        collect_related_tags(tag, &articles, group_tags(rows))
    };

    Ok(TagDateSummary {
        tag: tag.to_string(),
        count,
        articles,
        related_tags,
    })
}

/// First-seen ordered set of the tags on `articles`, without `excluded`.
fn collect_related_tags(
    excluded: &str,
    articles: &[i32],
    tags_by_article: HashMap<i32, Vec<String>>,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(excluded);

    let mut related = Vec::new();
    for id in articles {
        let Some(tags) = tags_by_article.get(id) else {
            continue;
        };
        for tag in tags {
            if seen.insert(tag.as_str()) {
                related.push(tag.clone());
            }
        }
    }
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::create_article;
    use crate::error::ArticleError;
    use crate::models::{ArticleRecord, ArticleTag, NewArticle};
    use crate::store::memory::InMemoryStore;
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    const DAY: &str = "2018-01-01";

    async fn add(store: &InMemoryStore, date: &str, tags: &[&str]) -> i32 {
        let new = NewArticle {
            title: "title".to_string(),
            date: date.parse::<NaiveDate>().unwrap(),
            body: "body".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        create_article(store, new).await.unwrap().id
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[tokio::test]
    async fn test_no_matches() {
        let store = InMemoryStore::new();
        add(&store, DAY, &["other"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary, TagDateSummary::empty("x"));
    }

    #[tokio::test]
    async fn test_two_articles_share_tag() {
        let store = InMemoryStore::new();
        let a = add(&store, DAY, &["x", "y"]).await;
        let b = add(&store, DAY, &["x", "z"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.tag, "x");
        assert_eq!(summary.count, 2);
        assert_eq!(summary.articles, vec![a, b]);
        assert_eq!(sorted(summary.related_tags), vec!["y", "z"]);
    }

    #[tokio::test]
    async fn test_single_match_reports_every_other_tag() {
        let store = InMemoryStore::new();
        add(&store, DAY, &["a", "x", "b", "a"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.related_tags, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_wrong_date_or_tag_excluded() {
        let store = InMemoryStore::new();
        let hit = add(&store, DAY, &["x", "keep"]).await;
        add(&store, "2018-01-02", &["x", "late"]).await;
        add(&store, DAY, &["y", "other"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.articles, vec![hit]);
        assert_eq!(summary.related_tags, vec!["keep"]);
    }

    #[tokio::test]
    async fn test_queried_tag_never_related() {
        let store = InMemoryStore::new();
        add(&store, DAY, &["x", "x", "y"]).await;
        add(&store, DAY, &["y", "x"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert!(!summary.related_tags.iter().any(|t| t == "x"));
        assert_eq!(summary.related_tags, vec!["y"]);
    }

    #[tokio::test]
    async fn test_count_unbounded_articles_capped() {
        let store = InMemoryStore::new();
        for _ in 0..15 {
            add(&store, DAY, &["x"]).await;
        }

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.count, 15);
        assert_eq!(summary.articles.len(), MAX_SUMMARY_ARTICLES);
        assert_eq!(summary.articles, (1..=10).collect::<Vec<i32>>());
    }

    #[tokio::test]
    async fn test_articles_len_is_min_of_count_and_cap() {
        for n in [0usize, 1, 9, 10, 11] {
            let store = InMemoryStore::new();
            for _ in 0..n {
                add(&store, DAY, &["x"]).await;
            }
            let summary = summarize(&store, "x", DAY).await.unwrap();
            assert_eq!(summary.count, n);
            assert_eq!(summary.articles.len(), n.min(MAX_SUMMARY_ARTICLES));
        }
    }

    #[tokio::test]
    async fn test_related_tags_only_from_capped_articles() {
        let store = InMemoryStore::new();
        for i in 0..10 {
            let tag = format!("common{}", i % 3);
            add(&store, DAY, &["x", tag.as_str()]).await;
        }
        add(&store, DAY, &["x", "only-eleventh"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.count, 11);
        assert!(!summary.related_tags.iter().any(|t| t == "only-eleventh"));
        assert_eq!(
            sorted(summary.related_tags),
            vec!["common0", "common1", "common2"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_tag_rows_count_twice() {
        let store = InMemoryStore::new();
        let id = add(&store, DAY, &["x", "x", "y"]).await;

        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.articles, vec![id, id]);
        assert_eq!(summary.related_tags, vec!["y"]);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_stable() {
        let store = InMemoryStore::new();
        add(&store, DAY, &["x", "y", "w"]).await;
        add(&store, DAY, &["x", "z"]).await;

        let first = summarize(&store, "x", DAY).await.unwrap();
        let second = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(first.count, second.count);
        let (mut a, mut b) = (first.articles, second.articles);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        assert_eq!(sorted(first.related_tags), sorted(second.related_tags));
    }

    #[tokio::test]
    async fn test_invalid_date_is_storage_error() {
        let store = InMemoryStore::new();
        let err = summarize(&store, "x", "2018-13-45").await.unwrap_err();
        assert!(matches!(err, ArticleError::Storage(_)));
    }

    /// Store whose join succeeds but whose tag lookups always fail.
    struct BrokenTagsStore {
        ids: Vec<i32>,
    }

    #[async_trait]
    impl ArticleStore for BrokenTagsStore {
        async fn fetch_article(&self, _id: i32) -> anyhow::Result<Option<ArticleRecord>> {
            Ok(None)
        }
        async fn list_articles(&self) -> anyhow::Result<Vec<ArticleRecord>> {
            Ok(Vec::new())
        }
        async fn insert_article(&self, _article: &NewArticle) -> anyhow::Result<i32> {
            bail!("read-only")
        }
        async fn insert_tag(&self, _article_id: i32, _tag: &str) -> anyhow::Result<()> {
            bail!("read-only")
        }
        async fn tags_for_article(&self, _article_id: i32) -> anyhow::Result<Vec<String>> {
            bail!("connection reset")
        }
        async fn tag_rows_for_articles(&self, _ids: &[i32]) -> anyhow::Result<Vec<ArticleTag>> {
            bail!("connection reset")
        }
        async fn article_ids_by_tag_and_date(
            &self,
            _tag: &str,
            _date: &str,
        ) -> anyhow::Result<Vec<i32>> {
            Ok(self.ids.clone())
        }
    }

    #[tokio::test]
    async fn test_tag_fetch_failure_fails_whole_summary() {
        let store = BrokenTagsStore { ids: vec![1, 2] };
        let err = summarize(&store, "x", DAY).await.unwrap_err();
        assert!(matches!(err, ArticleError::Storage(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_zero_matches_skips_tag_fetch() {
        let store = BrokenTagsStore { ids: Vec::new() };
        let summary = summarize(&store, "x", DAY).await.unwrap();
        assert_eq!(summary, TagDateSummary::empty("x"));
    }
}
