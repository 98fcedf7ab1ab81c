use vitrine_core::error::CoreError;

/// Errors raised by the site components.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;
