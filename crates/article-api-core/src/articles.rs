//! Article repository: lookup by id, creation with tag fan-out, listing.
//!
//! Every operation runs through the [`ArticleStore`] trait and translates
//! between [`Article`] and the `articles` / `tags` relations.

use crate::error::{ArticleError, Result};
use crate::models::{Article, NewArticle};
use crate::store::{group_tags, ArticleStore};

/// Fetch one article with its tags in store order.
///
/// Fails with [`ArticleError::NotFound`] when no row has `id`.
pub async fn get_article<S: ArticleStore + ?Sized>(store: &S, id: i32) -> Result<Article> {
    let record = store
        .fetch_article(id)
        .await?
        .ok_or(ArticleError::NotFound(id))?;
    let tags = store.tags_for_article(id).await?;
    Ok(Article::from_record(record, tags))
}

/// Insert an article, then one tag row per input tag, in order.
///
/// The inserts are not wrapped in a transaction: if a tag insert fails the
/// article row and any earlier tags stay persisted and the error is
/// returned.
pub async fn create_article<S: ArticleStore + ?Sized>(
    store: &S,
    new: NewArticle,
) -> Result<Article> {
    let id = store.insert_article(&new).await?;
    for tag in &new.tags {
        store.insert_tag(id, tag).await?;
    }
    Ok(Article {
        id,
        title: new.title,
        date: new.date,
        body: new.body,
        tags: new.tags,
    })
}

/// Every article with its tags. Unbounded; empty when the store is empty.
///
/// Tags are loaded with a single batched fetch and grouped per article.
pub async fn list_articles<S: ArticleStore + ?Sized>(store: &S) -> Result<Vec<Article>> {
    let records = store.list_articles().await?;
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
    let mut tags = group_tags(store.tag_rows_for_articles(&ids).await?);

    Ok(records
        .into_iter()
        .map(|record| {
            let article_tags = tags.remove(&record.id).unwrap_or_default();
            Article::from_record(record, article_tags)
        })
        .collect())
}
