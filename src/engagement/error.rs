use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
