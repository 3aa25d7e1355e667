//! Export engine for flagged case items
//!
//! Takes the hit records of a case, groups them by the rule-set that
//! flagged them, and copies every flagged file and directory tree into a
//! per-set folder under an output root, writing one manifest per set.
//!
//! ```text
//! <output root>/
//!     <set name>/
//!         <set name>.manifest
//!         report_5.txt
//!         Photos_42/Photos/...
//! ```
//!
//! # Example
//!
//! ```
//! use hits_case::MemoryCase;
//! use hits_core::{ExportConfig, ExportOutcome, Orchestrator};
//!
//! let mut case = MemoryCase::new();
//! case.add_file(5, None, "report.txt", Some(b"q3 numbers")).unwrap();
//! case.flag(5, "Finance", "Financial documents").unwrap();
//!
//! let out = tempfile::tempdir().unwrap();
//! let config = ExportConfig {
//!     output_root: Some(out.path().to_path_buf()),
//!     ..ExportConfig::default()
//! };
//!
//! let report = Orchestrator::new(&case, &case, config).unwrap().export().unwrap();
//! assert_eq!(report.outcome, ExportOutcome::Success);
//! assert!(out.path().join("Finance/report_5.txt").is_file());
//! assert!(out.path().join("Finance/Finance.manifest").is_file());
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod exporter;
pub mod grouper;
pub mod manifest;
pub mod naming;
pub mod orchestrator;
pub mod report;

pub use cancel::CancelFlag;
pub use config::{DEFAULT_SUBFOLDER, ExportConfig, OUT_DIR_MACRO, expand_macros};
pub use error::{Error, Result};
pub use exporter::Exporter;
pub use grouper::{Hit, SetGroup, SetGroups};
pub use manifest::{Manifest, ManifestEntry};
pub use orchestrator::Orchestrator;
pub use report::{ExportOutcome, ExportReport, HitFailure, SetReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_display_names_entity_and_path() {
        let error = Error::FileCopyFailed {
            id: 7,
            path: PathBuf::from("/out/set/a_7.txt"),
            source: hits_case::Error::ContentUnavailable { id: 7 },
        };

        let display = error.to_string();
        assert!(display.contains("entity 7"), "got: {display}");
        assert!(display.contains("/out/set/a_7.txt"), "got: {display}");
    }
}
