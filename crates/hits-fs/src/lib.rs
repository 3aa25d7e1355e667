//! Filesystem primitives for the interesting-files exporter
//!
//! Provides forward-slash path handling, directory creation, content copy,
//! atomic manifest writes and format-agnostic config loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, validate_path_component};
