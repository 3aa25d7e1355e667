//! Error types for hits-core

use hits_case::EntityId;
use std::path::PathBuf;

/// Result type for hits-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting flagged items
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A destination directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: hits_fs::Error,
    },

    /// File content could not be copied out of the case
    #[error("Failed to copy entity {id} to {path}: {source}")]
    FileCopyFailed {
        id: EntityId,
        path: PathBuf,
        #[source]
        source: hits_case::Error,
    },

    /// A rule-set manifest could not be rendered or written
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWriteFailed {
        path: PathBuf,
        #[source]
        source: hits_fs::Error,
    },

    /// A manifest document could not be read back
    #[error("Malformed manifest document: {message}")]
    ManifestParse { message: String },

    /// A flagged item would be exported onto the set's manifest
    #[error("Entity {id} would overwrite the set manifest at {path}")]
    ManifestPathConflict { id: EntityId, path: PathBuf },

    /// A hit record carried no set-name attribute
    #[error("Hit record {artifact_id} has no set name attribute")]
    MalformedHitRecord { artifact_id: u64 },

    /// Entity metadata or children could not be fetched
    #[error("Failed to look up entity {id}: {source}")]
    EntityLookup {
        id: EntityId,
        #[source]
        source: hits_case::Error,
    },

    /// The hit source could not be read
    #[error("Failed to read hit records: {0}")]
    HitSource(#[source] hits_case::Error),

    /// A set or entity name cannot be used as a path component
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// A directory export nested deeper than allowed
    #[error("Directory {id} exceeds the maximum export depth of {max_depth}")]
    RecursionLimit { id: EntityId, max_depth: usize },

    /// A directory id was reached twice within one export
    #[error("Directory {id} was reached twice while exporting; the case tree is corrupt")]
    CycleDetected { id: EntityId },

    /// The run was cancelled before this entity was exported
    #[error("Export cancelled before entity {id}")]
    Cancelled { id: EntityId },

    /// Invalid export configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Fs(#[from] hits_fs::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
