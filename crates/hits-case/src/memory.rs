//! In-memory case backend

use crate::{
    EntityId, EntityKind, EntityStore, Error, FileEntity, HitRecord, HitSource, Result,
};
use hits_fs::{NormalizedPath, io};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct StoredEntity {
    entity: FileEntity,
    content: Option<Vec<u8>>,
}

/// A case held entirely in memory.
///
/// Entities are registered parent-first; the logical path of each entity
/// is derived from its parent's. A file registered without content fails
/// every copy with [`Error::ContentUnavailable`].
///
/// ```
/// use hits_case::{EntityStore, HitSource, MemoryCase};
///
/// let mut case = MemoryCase::new();
/// case.add_directory(1, None, "Users").unwrap();
/// case.add_file(2, Some(1), "notes.txt", Some(b"hello")).unwrap();
/// case.flag(2, "Notes", "Plain-text notes").unwrap();
///
/// assert_eq!(case.entity(2).unwrap().unique_path, "/Users/notes.txt");
/// assert_eq!(case.hits().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCase {
    entities: HashMap<EntityId, StoredEntity>,
    children: HashMap<EntityId, Vec<EntityId>>,
    hits: Vec<HitRecord>,
}

impl MemoryCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(
        &mut self,
        id: EntityId,
        parent: Option<EntityId>,
        name: &str,
    ) -> Result<()> {
        self.insert(id, parent, name, EntityKind::Directory, None)
    }

    pub fn add_file(
        &mut self,
        id: EntityId,
        parent: Option<EntityId>,
        name: &str,
        content: Option<&[u8]>,
    ) -> Result<()> {
        self.insert(id, parent, name, EntityKind::File, content.map(<[u8]>::to_vec))
    }

    /// Record an upstream MD5 for an entity.
    pub fn set_md5(&mut self, id: EntityId, md5: impl Into<String>) -> Result<()> {
        let stored = self
            .entities
            .get_mut(&id)
            .ok_or(Error::EntityNotFound { id })?;
        stored.entity.md5 = Some(md5.into());
        Ok(())
    }

    /// Flag an entity under a rule-set. Returns the new artifact id.
    pub fn flag(&mut self, file_id: EntityId, set_name: &str, description: &str) -> Result<u64> {
        if !self.entities.contains_key(&file_id) {
            return Err(Error::EntityNotFound { id: file_id });
        }
        let artifact_id = self.next_artifact_id();
        self.hits
            .push(HitRecord::flagged(artifact_id, file_id, set_name, description));
        Ok(artifact_id)
    }

    /// Append an arbitrary record, malformed or not.
    pub fn add_hit(&mut self, record: HitRecord) {
        self.hits.push(record);
    }

    pub fn next_artifact_id(&self) -> u64 {
        self.hits
            .iter()
            .map(|hit| hit.artifact_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn insert(
        &mut self,
        id: EntityId,
        parent: Option<EntityId>,
        name: &str,
        kind: EntityKind,
        content: Option<Vec<u8>>,
    ) -> Result<()> {
        if self.entities.contains_key(&id) {
            return Err(Error::DuplicateEntity { id });
        }
        let unique_path = match parent {
            Some(parent_id) => {
                let parent_entity = &self
                    .entities
                    .get(&parent_id)
                    .ok_or(Error::EntityNotFound { id: parent_id })?
                    .entity;
                if !parent_entity.is_dir() {
                    return Err(Error::NotADirectory { id: parent_id });
                }
                format!("{}/{}", parent_entity.unique_path.trim_end_matches('/'), name)
            }
            None => format!("/{name}"),
        };

        if let Some(parent_id) = parent {
            self.children.entry(parent_id).or_default().push(id);
        }
        self.entities.insert(
            id,
            StoredEntity {
                entity: FileEntity {
                    id,
                    name: name.to_string(),
                    kind,
                    parent,
                    unique_path,
                    md5: None,
                },
                content,
            },
        );
        Ok(())
    }
}

impl EntityStore for MemoryCase {
    fn entity(&self, id: EntityId) -> Result<FileEntity> {
        self.entities
            .get(&id)
            .map(|stored| stored.entity.clone())
            .ok_or(Error::EntityNotFound { id })
    }

    fn children(&self, parent: EntityId) -> Result<Vec<FileEntity>> {
        if !self.entities.contains_key(&parent) {
            return Err(Error::EntityNotFound { id: parent });
        }
        let ids = self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[]);
        ids.iter().map(|id| self.entity(*id)).collect()
    }

    fn copy_content(&self, id: EntityId, dest: &NormalizedPath) -> Result<()> {
        let stored = self.entities.get(&id).ok_or(Error::EntityNotFound { id })?;
        if stored.entity.is_dir() {
            return Err(Error::NotAFile { id });
        }
        let content = stored
            .content
            .as_deref()
            .ok_or(Error::ContentUnavailable { id })?;
        io::write_bytes(dest, content)?;
        Ok(())
    }
}

impl HitSource for MemoryCase {
    fn hits(&self) -> Result<Vec<HitRecord>> {
        Ok(self.hits.clone())
    }
}
