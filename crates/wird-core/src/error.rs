use thiserror::Error;

#[derive(Debug, Error)]
pub enum WirdError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid reminder id: {0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, WirdError>;
