//! Error taxonomy shared by the repository and the summary engine.

use thiserror::Error;

/// Errors surfaced by article operations.
///
/// `NotFound` is kept distinct from `Storage` so the HTTP layer can answer
/// 404 instead of 500.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article not found: {0}")]
    NotFound(i32),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for ArticleError {
    fn from(err: anyhow::Error) -> Self {
        ArticleError::Storage(err)
    }
}

pub type Result<T, E = ArticleError> = std::result::Result<T, E>;
