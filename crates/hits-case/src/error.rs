//! Error types for hits-case

use crate::EntityId;

/// Result type for hits-case operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by entity stores and hit sources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Entity {id} not found")]
    EntityNotFound { id: EntityId },

    #[error("Entity {id} is registered more than once")]
    DuplicateEntity { id: EntityId },

    #[error("Entity {id} is not a file")]
    NotAFile { id: EntityId },

    #[error("Entity {id} is not a directory")]
    NotADirectory { id: EntityId },

    #[error("No content is available for entity {id}")]
    ContentUnavailable { id: EntityId },

    #[error("Corrupt catalog: {message}")]
    CorruptCatalog { message: String },

    #[error(transparent)]
    Fs(#[from] hits_fs::Error),
}
