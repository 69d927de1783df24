use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown sensitive category: {0}")]
    UnknownCategory(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
