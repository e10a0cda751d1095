use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Create-path upsert without `from`, `to` and `received_at`.
    #[error("missing required fields for new email {0}")]
    MissingRequiredFields(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Self::Provider(err.to_string())
    }
}
