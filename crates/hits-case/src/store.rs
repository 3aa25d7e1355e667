//! Traits at the boundary with the case database

use crate::{EntityId, FileEntity, HitRecord, Result};
use hits_fs::NormalizedPath;

/// Read access to the entities of a case.
///
/// Implementations must tolerate concurrent calls for distinct ids.
pub trait EntityStore: Send + Sync {
    /// Full metadata for one entity.
    fn entity(&self, id: EntityId) -> Result<FileEntity>;

    /// Direct children of `parent`, in store order.
    fn children(&self, parent: EntityId) -> Result<Vec<FileEntity>>;

    /// Copy the content of file `id` to `dest`, replacing any existing file.
    fn copy_content(&self, id: EntityId, dest: &NormalizedPath) -> Result<()>;
}

/// Source of the current flag records.
pub trait HitSource: Send + Sync {
    fn hits(&self) -> Result<Vec<HitRecord>>;
}
