//! File and directory entities

use serde::{Deserialize, Serialize};

/// Stable identifier of an entity in the case store
pub type EntityId = u64;

/// Whether an entity is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    File,
    Directory,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one file or directory in the case corpus.
///
/// Children are not held here; a store answers "which entities have this
/// parent" on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub parent: Option<EntityId>,
    /// Logical path of the entity inside the case, e.g. `/img/vol1/Users/a.txt`
    pub unique_path: String,
    /// MD5 computed upstream, if any
    pub md5: Option<String>,
}

impl FileEntity {
    pub fn is_dir(&self) -> bool {
        self.kind == EntityKind::Directory
    }
}
