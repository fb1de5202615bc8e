use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    Domain(#[from] secplan_core::DomainError),
}

pub type Result<T> = std::result::Result<T, StorageError>;
