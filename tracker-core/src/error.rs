use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine a data directory for the database")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, DbError>;
