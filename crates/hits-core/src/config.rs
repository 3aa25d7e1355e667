//! Export configuration and output-root resolution
//!
//! The output root is either given explicitly or derived from a template
//! containing host macros. `#OUT_DIR#` expands to the host's output
//! directory, so the default root is `<out dir>/InterestingFiles`.
//!
//! ```toml
//! output_template = "#OUT_DIR#/InterestingFiles"
//! out_dir = "/cases/1234/output"
//! max_depth = 64
//! jobs = 4
//! ```

use crate::{Error, Result};
use hits_fs::{ConfigStore, NormalizedPath, validate_path_component};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Macro replaced by the host output directory
pub const OUT_DIR_MACRO: &str = "#OUT_DIR#";

/// Subfolder used by the default output template
pub const DEFAULT_SUBFOLDER: &str = "InterestingFiles";

fn default_output_template() -> String {
    format!("{OUT_DIR_MACRO}/{DEFAULT_SUBFOLDER}")
}

fn default_max_depth() -> usize {
    256
}

fn default_jobs() -> usize {
    1
}

fn default_manifest_extension() -> String {
    "manifest".to_string()
}

/// Settings for one export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Explicit destination root; an empty path counts as unset
    pub output_root: Option<PathBuf>,

    /// Template used when `output_root` is unset
    pub output_template: String,

    /// Value of the `#OUT_DIR#` macro
    pub out_dir: Option<PathBuf>,

    /// Deepest subdirectory nesting exported below a flagged directory
    pub max_depth: usize,

    /// Number of rule-sets exported concurrently
    pub jobs: usize,

    /// Extension of the per-set manifest file
    pub manifest_extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: None,
            output_template: default_output_template(),
            out_dir: None,
            max_depth: default_max_depth(),
            jobs: default_jobs(),
            manifest_extension: default_manifest_extension(),
        }
    }
}

impl ExportConfig {
    /// Load a config file (`.toml`, `.json`, `.yaml`, `.yml`).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let config: ExportConfig = ConfigStore::new().load(path)?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::config("jobs must be at least 1"));
        }
        validate_path_component(&self.manifest_extension, "Manifest extension")
            .map_err(Error::config)?;
        Ok(())
    }

    /// Resolve the destination root.
    ///
    /// A non-empty `output_root` wins. Otherwise the template is expanded,
    /// which fails if it needs `#OUT_DIR#` and no `out_dir` is configured.
    pub fn resolve_output_root(&self) -> Result<NormalizedPath> {
        match &self.output_root {
            Some(root) if !root.as_os_str().is_empty() => Ok(NormalizedPath::new(root)),
            _ => expand_macros(&self.output_template, self.out_dir.as_deref()).map(NormalizedPath::new),
        }
    }

    /// File name of the manifest for `set_name`.
    pub fn manifest_file_name(&self, set_name: &str) -> String {
        format!("{}.{}", set_name, self.manifest_extension)
    }
}

/// Expand host macros in `template`.
pub fn expand_macros(template: &str, out_dir: Option<&Path>) -> Result<String> {
    let expanded = if template.contains(OUT_DIR_MACRO) {
        let out_dir = out_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "output template '{template}' uses {OUT_DIR_MACRO} but no output directory is configured"
                ))
            })?;
        let out_dir = NormalizedPath::new(out_dir);
        template.replace(OUT_DIR_MACRO, out_dir.as_str().trim_end_matches('/'))
    } else {
        template.to_string()
    };

    if expanded.trim().is_empty() {
        return Err(Error::config("output root is empty"));
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_root_is_out_dir_subfolder() {
        let config = ExportConfig {
            out_dir: Some(PathBuf::from("/case/out")),
            ..ExportConfig::default()
        };

        assert_eq!(
            config.resolve_output_root().unwrap().as_str(),
            "/case/out/InterestingFiles"
        );
    }

    #[test]
    fn explicit_root_wins_over_template() {
        let config = ExportConfig {
            output_root: Some(PathBuf::from("/explicit")),
            out_dir: Some(PathBuf::from("/case/out")),
            ..ExportConfig::default()
        };

        assert_eq!(config.resolve_output_root().unwrap().as_str(), "/explicit");
    }

    #[test]
    fn empty_root_falls_back_to_template() {
        let config = ExportConfig {
            output_root: Some(PathBuf::new()),
            out_dir: Some(PathBuf::from("/case/out/")),
            ..ExportConfig::default()
        };

        assert_eq!(
            config.resolve_output_root().unwrap().as_str(),
            "/case/out/InterestingFiles"
        );
    }

    #[test]
    fn template_without_out_dir_is_a_config_error() {
        let result = ExportConfig::default().resolve_output_root();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn template_without_macro_is_used_verbatim() {
        assert_eq!(expand_macros("/srv/export", None).unwrap(), "/srv/export");
    }

    #[test]
    fn validate_rejects_zero_jobs_and_bad_extension() {
        let zero_jobs = ExportConfig {
            jobs: 0,
            ..ExportConfig::default()
        };
        assert!(zero_jobs.validate().is_err());

        let bad_ext = ExportConfig {
            manifest_extension: "x/y".into(),
            ..ExportConfig::default()
        };
        assert!(bad_ext.validate().is_err());
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ExportConfig = toml::from_str("jobs = 3").unwrap();
        assert_eq!(config.jobs, 3);
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.output_template, "#OUT_DIR#/InterestingFiles");
        assert_eq!(config.manifest_file_name("Docs"), "Docs.manifest");
    }
}
