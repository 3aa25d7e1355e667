//! Format-agnostic loading of configuration and catalog files

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Format-agnostic document store.
///
/// Detects the format from the file extension: `.toml`, `.json`,
/// `.yaml` or `.yml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a document.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("").to_lowercase();

        let parse_err = |format: &str, message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_err("TOML", e.to_string())),
            "json" => serde_json::from_str(&content).map_err(|e| parse_err("JSON", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_err("YAML", e.to_string()))
            }
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}
