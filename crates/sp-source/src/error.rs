use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("feature parse error: {0}")]
    Parse(String),

    #[error("feature store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
