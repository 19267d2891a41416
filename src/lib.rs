//! # Article API
//!
//! **An HTTP service for short tagged articles.**
//!
//! Articles (title, date, body, tags) are stored in PostgreSQL and exposed
//! over a small JSON API: list, create, fetch by id, and a tag/date summary
//! that counts the articles carrying a tag on a given day and reports the
//! tags that co-occur with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌──────────────┐
//! │   HTTP   │──▶│ article repository   │──▶│ ArticleStore │
//! │  (axum)  │   │ tag/date summary     │   │  PgStore     │
//! └──────────┘   └──────────────────────┘   └──────┬───────┘
//!                                                  ▼
//!                                           ┌──────────────┐
//!                                           │  PostgreSQL  │
//!                                           └──────────────┘
//! ```
//!
//! The repository and summary engine live in `article-api-core` and only
//! see the [`ArticleStore`](article_api_core::store::ArticleStore) trait.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Environment-based configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`db`] | Connection pool |
//! | [`schema`] | Table creation |
//! | [`pg_store`] | PostgreSQL `ArticleStore` |
//! | [`server`] | HTTP router and handlers |

pub mod config;
pub mod db;
pub mod logging;
pub mod pg_store;
pub mod schema;
pub mod server;
