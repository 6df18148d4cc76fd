use thiserror::Error;

use crate::categories::Domain;

#[derive(Error, Debug)]
pub enum BaonError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("no active {0} record")]
    NoActiveRecord(Domain),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BaonError>;
