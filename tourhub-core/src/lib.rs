pub mod identity;
pub mod repository;
pub mod session;
pub mod tour;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Session initialization failed: {0}")]
    SessionError(String),
    #[error("Data loading failed: {0}")]
    DataError(String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}
