use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Index not ready: no snapshot has been built")]
    NotReady,

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors the caller can recover from by fixing input or retrying later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidQuery(_) | Error::NotReady)
    }
}
