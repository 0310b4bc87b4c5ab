use thiserror::Error;

#[derive(Debug, Error)]
pub enum TpdError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing column {0}")]
    MissingColumn(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, TpdError>;
