//! Case entity store and flagged-hit sources
//!
//! The exporter never walks a case directly. It asks an [`EntityStore`] for
//! entity metadata, for the direct children of a directory, and to copy a
//! file's content out; and it asks a [`HitSource`] for the flag records.
//!
//! Two backends are provided:
//!
//! - [`MemoryCase`] keeps everything in memory and is built through method
//!   calls. Useful for embedding and tests.
//! - [`CatalogCase`] loads a catalog document (TOML, JSON or YAML) listing
//!   entities and hit records, and reads file content from a source
//!   directory on disk.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod hit;
pub mod memory;
pub mod store;

pub use catalog::{Catalog, CatalogCase, CatalogEntity};
pub use entity::{EntityId, EntityKind, FileEntity};
pub use error::{Error, Result};
pub use hit::{AttributeKind, HitAttribute, HitRecord};
pub use memory::MemoryCase;
pub use store::{EntityStore, HitSource};
