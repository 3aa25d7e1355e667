//! [`TestCase`] builder for export scenarios.

use hits_case::{Catalog, CatalogCase, CatalogEntity, EntityId, EntityKind, HitRecord};
use hits_fs::NormalizedPath;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary case: a catalog, its content blobs, and an output folder.
///
/// # Example
///
/// ```rust
/// use hits_test_utils::TestCase;
///
/// let mut case = TestCase::new();
/// case.dir(42, None, "Photos");
/// case.file(43, Some(42), "a.jpg", "jpeg bytes");
/// case.flag(42, "Pictures", "Image files");
/// let catalog = case.write_catalog();
/// assert!(catalog.is_file());
///
/// // Hand `case.load()` to an exporter, then check `case.output_root()`
/// // with `assert_output_file`.
/// let _source = case.load();
/// ```
pub struct TestCase {
    temp_dir: TempDir,
    catalog: Catalog,
    next_artifact: u64,
}

impl Default for TestCase {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCase {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            catalog: Catalog::default(),
            next_artifact: 1,
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Where exports are expected to go: `<root>/out`.
    pub fn output_root(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Register a directory entity.
    pub fn dir(&mut self, id: EntityId, parent: Option<EntityId>, name: &str) -> &mut Self {
        self.catalog.entities.push(CatalogEntity {
            id,
            name: name.to_string(),
            kind: EntityKind::Directory,
            parent,
            path: None,
            md5: None,
            source: None,
        });
        self
    }

    /// Register a file entity and write its content blob.
    pub fn file(
        &mut self,
        id: EntityId,
        parent: Option<EntityId>,
        name: &str,
        content: &str,
    ) -> &mut Self {
        let source = format!("blobs/{id}");
        let blob = self.root().join(&source);
        fs::create_dir_all(blob.parent().unwrap()).unwrap();
        fs::write(&blob, content).unwrap();
        self.catalog.entities.push(CatalogEntity {
            id,
            name: name.to_string(),
            kind: EntityKind::File,
            parent,
            path: None,
            md5: None,
            source: Some(source),
        });
        self
    }

    /// Register a file entity whose content is missing from disk.
    pub fn missing_file(&mut self, id: EntityId, parent: Option<EntityId>, name: &str) -> &mut Self {
        self.catalog.entities.push(CatalogEntity {
            id,
            name: name.to_string(),
            kind: EntityKind::File,
            parent,
            path: None,
            md5: None,
            source: Some(format!("blobs/missing-{id}")),
        });
        self
    }

    /// Attach an upstream MD5 to a registered entity.
    pub fn md5(&mut self, id: EntityId, md5: &str) -> &mut Self {
        let entity = self
            .catalog
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .unwrap_or_else(|| panic!("TestCase::md5: unknown entity {id}"));
        entity.md5 = Some(md5.to_string());
        self
    }

    /// Flag an entity under a rule-set.
    pub fn flag(&mut self, file_id: EntityId, set_name: &str, description: &str) -> &mut Self {
        let artifact_id = self.next_artifact;
        self.next_artifact += 1;
        self.catalog
            .hits
            .push(HitRecord::flagged(artifact_id, file_id, set_name, description));
        self
    }

    /// Add a hit record with no set-name attribute.
    pub fn malformed_hit(&mut self, file_id: EntityId) -> &mut Self {
        let artifact_id = self.next_artifact;
        self.next_artifact += 1;
        self.catalog.hits.push(HitRecord {
            artifact_id,
            file_id,
            attributes: Vec::new(),
        });
        self
    }

    /// Write `case.toml` and return its path.
    pub fn write_catalog(&self) -> PathBuf {
        let path = self.root().join("case.toml");
        fs::write(&path, toml::to_string_pretty(&self.catalog).unwrap()).unwrap();
        path
    }

    /// Write the catalog and load it as a [`CatalogCase`].
    pub fn load(&self) -> CatalogCase {
        let path = self.write_catalog();
        CatalogCase::load(&NormalizedPath::new(&path), None).unwrap()
    }

    /// Assert that `relative` exists under the output root with `content`.
    pub fn assert_output_file(&self, relative: &str, content: &str) {
        let path = self.output_root().join(relative);
        let actual = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("expected output file {}: {e}", path.display()));
        assert_eq!(actual, content, "content mismatch at {}", path.display());
    }

    /// Assert that `relative` is a directory under the output root.
    pub fn assert_output_dir(&self, relative: &str) {
        let path = self.output_root().join(relative);
        assert!(path.is_dir(), "expected output directory {}", path.display());
    }

    /// Assert that nothing exists at `relative` under the output root.
    pub fn assert_output_missing(&self, relative: &str) {
        let path = self.output_root().join(relative);
        assert!(!path.exists(), "expected nothing at {}", path.display());
    }

    /// Read a file under the output root.
    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output_root().join(relative)).unwrap()
    }
}
