use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Corrupt application data: {0}")]
    CorruptData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
