//! File and directory exporters
//!
//! Layout under a set folder:
//!
//! ```text
//! <set folder>/
//!     <file stem>_<id>.<ext>          flagged file
//!     <dir name>_<id>/                flagged directory (wrapper)
//!         <dir name>/
//!             <child file>            plain names below the wrapper
//!             <child dir>/
//! ```

use crate::manifest::{Manifest, ManifestEntry};
use crate::naming::{suffixed_file_name, wrapper_dir_name};
use crate::{Error, Result};
use hits_case::{EntityId, EntityStore, FileEntity};
use hits_fs::{NormalizedPath, io, validate_path_component};
use std::collections::HashSet;

/// Copies entities out of an [`EntityStore`] and records them in a manifest.
///
/// A failure anywhere inside a directory export aborts the rest of that
/// directory; entries already recorded stay in the manifest.
pub struct Exporter<'a> {
    store: &'a dyn EntityStore,
    max_depth: usize,
    reserved: Option<NormalizedPath>,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a dyn EntityStore, max_depth: usize) -> Self {
        Self {
            store,
            max_depth,
            reserved: None,
        }
    }

    /// Refuse to export a flagged item onto `path`, e.g. the set's manifest.
    pub fn reserving(mut self, path: NormalizedPath) -> Self {
        self.reserved = Some(path);
        self
    }

    /// Export a flagged file as `<dest_dir>/<stem>_<id>.<ext>`.
    pub fn export_file(
        &self,
        file: &FileEntity,
        dest_dir: &NormalizedPath,
        manifest: &mut Manifest,
    ) -> Result<NormalizedPath> {
        check_name(&file.name)?;
        let dest = dest_dir.join(&suffixed_file_name(&file.name, file.id));
        self.check_reserved(file.id, &dest)?;
        self.copy(file, &dest)?;
        manifest.add_entry(ManifestEntry::saved(file, dest.clone()));
        Ok(dest)
    }

    /// Export a flagged directory as `<dest_parent>/<name>_<id>/<name>/...`.
    ///
    /// Returns the inner directory.
    pub fn export_directory(
        &self,
        dir: &FileEntity,
        dest_parent: &NormalizedPath,
        manifest: &mut Manifest,
    ) -> Result<NormalizedPath> {
        check_name(&dir.name)?;
        let wrapper = dest_parent.join(&wrapper_dir_name(&dir.name, dir.id));
        self.check_reserved(dir.id, &wrapper)?;
        let inner = wrapper.join(&dir.name);
        create_dir(&inner)?;
        manifest.add_entry(ManifestEntry::saved(dir, inner.clone()));

        let mut visited = HashSet::from([dir.id]);
        self.export_contents(dir.id, &inner, 0, &mut visited, manifest)?;
        Ok(inner)
    }

    /// Mirror the children of `dir_id` into `dir_path`. `depth` is the
    /// nesting level of `dir_id` below the flagged directory.
    fn export_contents(
        &self,
        dir_id: EntityId,
        dir_path: &NormalizedPath,
        depth: usize,
        visited: &mut HashSet<EntityId>,
        manifest: &mut Manifest,
    ) -> Result<()> {
        let children = self
            .store
            .children(dir_id)
            .map_err(|source| Error::EntityLookup { id: dir_id, source })?;

        for child in children {
            check_name(&child.name)?;
            let child_path = dir_path.join(&child.name);

            if child.is_dir() {
                if !visited.insert(child.id) {
                    return Err(Error::CycleDetected { id: child.id });
                }
                if depth + 1 > self.max_depth {
                    return Err(Error::RecursionLimit {
                        id: child.id,
                        max_depth: self.max_depth,
                    });
                }
                // Only the flagged directory itself gets a directory entry.
                create_dir(&child_path)?;
                self.export_contents(child.id, &child_path, depth + 1, visited, manifest)?;
            } else {
                self.copy(&child, &child_path)?;
                manifest.add_entry(ManifestEntry::saved(&child, child_path));
            }
        }
        Ok(())
    }

    fn check_reserved(&self, id: EntityId, dest: &NormalizedPath) -> Result<()> {
        match &self.reserved {
            Some(reserved) if reserved == dest => Err(Error::ManifestPathConflict {
                id,
                path: dest.to_native(),
            }),
            _ => Ok(()),
        }
    }

    fn copy(&self, file: &FileEntity, dest: &NormalizedPath) -> Result<()> {
        self.store
            .copy_content(file.id, dest)
            .map_err(|source| Error::FileCopyFailed {
                id: file.id,
                path: dest.to_native(),
                source,
            })?;
        tracing::trace!(id = file.id, dest = %dest, "copied file");
        Ok(())
    }
}

pub(crate) fn create_dir(path: &NormalizedPath) -> Result<()> {
    io::ensure_dir(path).map_err(|source| Error::DirectoryCreateFailed {
        path: path.to_native(),
        source,
    })
}

pub(crate) fn check_name(name: &str) -> Result<()> {
    validate_path_component(name, "Entity name").map_err(|reason| Error::InvalidName { reason })
}
