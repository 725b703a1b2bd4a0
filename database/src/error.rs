use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Corrupt stored row: {0}")]
    InvalidRow(String),

    #[error("Match id parsing error: {0}")]
    UuidParsing(#[from] uuid::Error),
}
