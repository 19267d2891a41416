//! # Article API Core
//!
//! Storage-agnostic logic for Article API: data models, the error
//! taxonomy, the [`store::ArticleStore`] abstraction, the article
//! repository, and the tag/date summary engine.
//!
//! This crate contains no tokio, sqlx, or HTTP dependencies. The
//! application crate supplies a concrete store (PostgreSQL) and the
//! HTTP surface.

pub mod articles;
pub mod error;
pub mod models;
pub mod store;
pub mod summary;
