//! Catalog-file case backend
//!
//! A catalog lists every entity of a case and the current flag records:
//!
//! ```toml
//! [[entities]]
//! id = 10
//! name = "Photos"
//! kind = "directory"
//!
//! [[entities]]
//! id = 11
//! name = "beach.jpg"
//! kind = "file"
//! parent = 10
//! md5 = "9e107d9d372bb6826bd81d3542a419d6"
//! source = "blobs/11"
//!
//! [[hits]]
//! artifact_id = 1
//! file_id = 10
//! attributes = [{ kind = "set_name", value = "Pictures", context = "Image files" }]
//! ```
//!
//! A relative `source` is resolved against the catalog's source root; an
//! absolute one is used as-is. `path` may give
//! the logical path explicitly; otherwise it is derived from the parent chain.

use crate::{
    EntityId, EntityKind, EntityStore, Error, FileEntity, HitRecord, HitSource, Result,
};
use hits_fs::{ConfigStore, NormalizedPath, io};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One entity entry of a catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A catalog document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub entities: Vec<CatalogEntity>,
    #[serde(default)]
    pub hits: Vec<HitRecord>,
}

/// A case backed by a catalog document and a directory of file content.
#[derive(Debug)]
pub struct CatalogCase {
    source_root: NormalizedPath,
    entities: HashMap<EntityId, FileEntity>,
    sources: HashMap<EntityId, String>,
    children: HashMap<EntityId, Vec<EntityId>>,
    hits: Vec<HitRecord>,
}

impl CatalogCase {
    /// Load a catalog file. Content sources resolve against `source_root`,
    /// or against the catalog's own directory when `None`.
    pub fn load(path: &NormalizedPath, source_root: Option<NormalizedPath>) -> Result<Self> {
        let catalog: Catalog = ConfigStore::new().load(path)?;
        let source_root = source_root
            .or_else(|| path.parent())
            .unwrap_or_else(|| NormalizedPath::new("."));
        tracing::debug!(
            catalog = %path,
            entities = catalog.entities.len(),
            hits = catalog.hits.len(),
            "loaded catalog"
        );
        Self::from_catalog(catalog, source_root)
    }

    /// Index an in-memory catalog.
    pub fn from_catalog(catalog: Catalog, source_root: NormalizedPath) -> Result<Self> {
        let mut by_id: HashMap<EntityId, CatalogEntity> = HashMap::new();
        let mut order = Vec::with_capacity(catalog.entities.len());
        for entry in catalog.entities {
            if by_id.contains_key(&entry.id) {
                return Err(Error::DuplicateEntity { id: entry.id });
            }
            order.push(entry.id);
            by_id.insert(entry.id, entry);
        }

        let mut children: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        for id in &order {
            if let Some(parent) = by_id[id].parent {
                match by_id.get(&parent) {
                    Some(p) if p.kind == EntityKind::Directory => {
                        children.entry(parent).or_default().push(*id)
                    }
                    Some(_) => {
                        return Err(Error::CorruptCatalog {
                            message: format!("entity {id} has non-directory parent {parent}"),
                        });
                    }
                    None => {
                        return Err(Error::CorruptCatalog {
                            message: format!("entity {id} has unknown parent {parent}"),
                        });
                    }
                }
            }
        }

        let mut entities = HashMap::with_capacity(order.len());
        let mut sources = HashMap::new();
        for id in &order {
            let entry = &by_id[id];
            let unique_path = match &entry.path {
                Some(path) => path.clone(),
                None => derive_path(*id, &by_id)?,
            };
            if let Some(source) = &entry.source {
                sources.insert(*id, source.clone());
            }
            entities.insert(
                *id,
                FileEntity {
                    id: *id,
                    name: entry.name.clone(),
                    kind: entry.kind,
                    parent: entry.parent,
                    unique_path,
                    md5: entry.md5.clone().filter(|md5| !md5.is_empty()),
                },
            );
        }

        Ok(Self {
            source_root,
            entities,
            sources,
            children,
            hits: catalog.hits,
        })
    }

    pub fn source_root(&self) -> &NormalizedPath {
        &self.source_root
    }

    /// Absolute sources are used as-is; relative ones resolve against the
    /// source root.
    fn source_path(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_root.join(source).to_native()
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Build `/a/b/c` from the parent chain, refusing cyclic chains.
fn derive_path(id: EntityId, by_id: &HashMap<EntityId, CatalogEntity>) -> Result<String> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(id);
    while let Some(cur) = current {
        if !seen.insert(cur) {
            return Err(Error::CorruptCatalog {
                message: format!("parent chain of entity {id} loops through {cur}"),
            });
        }
        let entry = &by_id[&cur];
        names.push(entry.name.as_str());
        current = entry.parent;
    }
    names.reverse();
    Ok(format!("/{}", names.join("/")))
}

impl EntityStore for CatalogCase {
    fn entity(&self, id: EntityId) -> Result<FileEntity> {
        self.entities
            .get(&id)
            .cloned()
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
        let entity = self.entities.get(&id).ok_or(Error::EntityNotFound { id })?;
        if entity.is_dir() {
            return Err(Error::NotAFile { id });
        }
        let source = self
            .sources
            .get(&id)
            .ok_or(Error::ContentUnavailable { id })?;
        io::copy_file(&self.source_path(source), dest)?;
        Ok(())
    }
}

impl HitSource for CatalogCase {
    fn hits(&self) -> Result<Vec<HitRecord>> {
        Ok(self.hits.clone())
    }
}
