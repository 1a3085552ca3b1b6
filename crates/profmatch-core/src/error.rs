//! Error types for profmatch-core

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for profmatch operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// Main error type for profmatch operations
#[derive(Error, Debug)]
pub enum MatchError {
    /// A student profile, professor, or scope yielded no data
    #[error("Not found: {0}")]
    NotFound(String),

    /// The feature/option catalog is empty or incomplete
    #[error("System not configured: {0}")]
    Unconfigured(String),

    /// Input rejected before it reached the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl MatchError {
    /// Short machine-readable kind, used in transport error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::NotFound(_) => "not_found",
            MatchError::Unconfigured(_) => "unconfigured",
            MatchError::Validation(_) => "validation",
            MatchError::Persistence(_) => "persistence",
            MatchError::Config(_) => "config",
        }
    }
}

/// Persistence-specific errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for MatchError {
    fn from(err: rusqlite::Error) -> Self {
        MatchError::Persistence(PersistenceError::Database(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(MatchError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(MatchError::Unconfigured("x".into()).kind(), "unconfigured");
        assert_eq!(MatchError::Validation("x".into()).kind(), "validation");
        let err: MatchError = PersistenceError::Io("disk".into()).into();
        assert_eq!(err.kind(), "persistence");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = MatchError::NotFound("student 42".to_string());
        assert_eq!(err.to_string(), "Not found: student 42");
    }
}
