//! HTTP server exposing the article API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/articles` | List every article with its tags |
//! | `POST` | `/articles` | Create an article (`201` with the stored article) |
//! | `GET`  | `/articles/{id}` | Fetch one article by numeric id |
//! | `GET`  | `/articles/{tag}/{date}` | Tag/date summary |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a single message:
//!
//! ```json
//! { "error": "Article not found" }
//! ```
//!
//! `400` for an undecodable payload or a non-numeric id, `404` for a missing
//! article, `500` for storage failures.
//!
//! # Summary errors
//!
//! With [`SummaryMode::Lenient`] (the default) a failed summary is logged and
//! answered with `200` and an empty summary for the queried tag. With
//! [`SummaryMode::Strict`] it is mapped like any other error.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use article_api_core::articles;
use article_api_core::error::ArticleError;
use article_api_core::models::{Article, NewArticle, TagDateSummary};
use article_api_core::store::ArticleStore;
use article_api_core::summary;

use crate::config::{Config, SummaryMode};
use crate::db;
use crate::pg_store::PgStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    /// Store shared by every request for the lifetime of the process.
    store: Arc<dyn ArticleStore>,
    summary_mode: SummaryMode,
}

/// Build the router over any [`ArticleStore`].
///
/// Used by [`run_server`] with a [`PgStore`], and by tests with an
/// in-memory store.
pub fn build_router(store: Arc<dyn ArticleStore>, summary_mode: SummaryMode) -> Router {
    let state = AppState {
        store,
        summary_mode,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/articles",
            get(handle_list_articles).post(handle_create_article),
        )
        // One parameter name per position: `{id}` is the tag in the summary route.
        .route("/articles/{id}", get(handle_get_article))
        .route("/articles/{id}/{date}", get(handle_tag_date_summary))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server against the configured PostgreSQL database.
///
/// Runs until SIGINT or SIGTERM, then drains in-flight requests.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    let store: Arc<dyn ArticleStore> = Arc::new(PgStore::new(pool.clone()));
    let app = build_router(store, config.server.summary_mode);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(
        bind = %config.server.bind,
        summary_mode = ?config.server.summary_mode,
        "article API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn article_not_found() -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: "Article not found".to_string(),
    }
}

impl From<ArticleError> for AppError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::NotFound(_) => article_not_found(),
            ArticleError::Validation(message) => bad_request(message),
            ArticleError::Storage(_) => {
                error!(error = %err, "storage failure");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Accept only ASCII digits. A number beyond the `serial` range names no
/// row, so it is answered as not found.
fn parse_article_id(raw: &str) -> Result<i32, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_request("Invalid article ID"));
    }
    raw.parse::<i32>().map_err(|_| article_not_found())
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /articles ============

async fn handle_list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Article>>, AppError> {
    let articles = articles::list_articles(state.store.as_ref()).await?;
    Ok(Json(articles))
}

async fn handle_create_article(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Article>), AppError> {
    // Decoded regardless of Content-Type; only undecodable bodies are rejected.
    let new: NewArticle = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected article payload");
        bad_request("Invalid request payload")
    })?;

    let article = articles::create_article(state.store.as_ref(), new).await?;
    info!(id = article.id, tags = article.tags.len(), "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

async fn handle_get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let id = parse_article_id(&id)?;
    let article = articles::get_article(state.store.as_ref(), id).await?;
    Ok(Json(article))
}

// ============ GET /articles/{tag}/{date} ============

async fn handle_tag_date_summary(
    State(state): State<AppState>,
    Path((tag, date)): Path<(String, String)>,
) -> Result<Json<TagDateSummary>, AppError> {
    match summary::summarize(state.store.as_ref(), &tag, &date).await {
        Ok(summary) => Ok(Json(summary)),
        Err(err) => match state.summary_mode {
            SummaryMode::Lenient => {
                warn!(tag = %tag, date = %date, error = %err, "summary failed, returning empty summary");
                Ok(Json(TagDateSummary::empty(tag)))
            }
            SummaryMode::Strict => Err(err.into()),
        },
    }
}
