//! Command implementations for hits-cli

pub mod completions;
pub mod export;
pub mod sets;

pub use completions::run_completions;
pub use export::run_export;
pub use sets::run_sets;

use std::path::Path;

use hits_case::CatalogCase;
use hits_fs::{NormalizedPath, io};

use crate::error::{CliError, Result};

/// Load the case catalog at `catalog`.
pub(crate) fn load_case(catalog: &Path, source_root: Option<&Path>) -> Result<CatalogCase> {
    let path = NormalizedPath::new(catalog);
    if !path.is_file() {
        return Err(CliError::user(format!("Catalog not found: {path}")));
    }
    let path = io::canonicalize(&path)?;
    let case = CatalogCase::load(&path, source_root.map(NormalizedPath::new))?;
    tracing::debug!(
        catalog = %path,
        source_root = %case.source_root(),
        entities = case.len(),
        "loaded catalog"
    );
    Ok(case)
}
