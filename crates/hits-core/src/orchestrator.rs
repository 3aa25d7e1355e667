//! Top-level export driver
//!
//! One run:
//!
//! 1. create the output root (fatal on failure);
//! 2. group the current hit records by rule-set name;
//! 3. per set, in ascending name order: create `<root>/<set>/`, export each
//!    hit (a failing hit is logged, recorded and skipped), then write
//!    `<root>/<set>/<set>.manifest` (fatal on failure).
//!
//! Sets are independent, so with `jobs > 1` they run on a thread pool.

use crate::cancel::CancelFlag;
use crate::config::ExportConfig;
use crate::exporter::{Exporter, create_dir};
use crate::grouper::{Hit, SetGroup, SetGroups};
use crate::manifest::Manifest;
use crate::report::{ExportReport, HitFailure, SetReport};
use crate::{Error, Result};
use hits_case::{EntityStore, HitSource};
use hits_fs::{NormalizedPath, RobustnessConfig, validate_path_component};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

/// Drives an export of all flagged items of a case.
pub struct Orchestrator<'a> {
    store: &'a dyn EntityStore,
    hits: &'a dyn HitSource,
    config: ExportConfig,
    output_root: NormalizedPath,
    cancel: CancelFlag,
    robustness: RobustnessConfig,
}

/// Result of exporting one set: its report and the failures inside it.
struct SetRun {
    report: Option<SetReport>,
    failures: Vec<HitFailure>,
}

impl<'a> Orchestrator<'a> {
    /// Validate `config` and resolve the output root.
    pub fn new(
        store: &'a dyn EntityStore,
        hits: &'a dyn HitSource,
        config: ExportConfig,
    ) -> Result<Self> {
        config.validate()?;
        let output_root = config.resolve_output_root()?;
        Ok(Self {
            store,
            hits,
            config,
            output_root,
            cancel: CancelFlag::new(),
            robustness: RobustnessConfig::default(),
        })
    }

    /// Use `cancel` to stop the run between hits.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub fn output_root(&self) -> &NormalizedPath {
        &self.output_root
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export every rule-set.
    ///
    /// Returns `Err` only for failures that end the run: the output root
    /// cannot be created, the hit source cannot be read, or a manifest
    /// cannot be written. Everything else is recorded in the report.
    pub fn export(&self) -> Result<ExportReport> {
        info!(output_root = %self.output_root, "export started");

        create_dir(&self.output_root)?;

        let records = self.hits.hits().map_err(Error::HitSource)?;
        let groups = SetGroups::from_records(&records);
        debug!(
            records = records.len(),
            sets = groups.len(),
            skipped = groups.malformed().len(),
            "grouped hit records"
        );

        let runs = if self.config.jobs > 1 && groups.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
                .map_err(|e| Error::config(format!("cannot start worker pool: {e}")))?;
            let groups: Vec<SetGroup<'_>> = groups.iter().collect();
            pool.install(|| {
                groups
                    .par_iter()
                    .map(|group| self.export_set(*group))
                    .collect::<Vec<_>>()
            })
        } else {
            // Sequential runs stop at the first fatal manifest failure.
            let mut runs = Vec::with_capacity(groups.len());
            for group in groups.iter() {
                let run = self.export_set(group);
                let fatal = run.is_err();
                runs.push(run);
                if fatal {
                    break;
                }
            }
            runs
        };

        let mut sets = Vec::with_capacity(runs.len());
        let mut failures = Vec::new();
        for run in runs {
            let run = run?;
            sets.extend(run.report);
            failures.extend(run.failures);
        }

        let report = ExportReport::new(
            self.output_root.clone(),
            sets,
            failures,
            groups.malformed().to_vec(),
        );
        info!(
            outcome = %report.outcome,
            sets = report.sets.len(),
            entries = report.total_entries(),
            failures = report.failures.len(),
            "export finished"
        );
        Ok(report)
    }

    fn export_set(&self, group: SetGroup<'_>) -> Result<SetRun> {
        let folder = self.output_root.join(group.name);

        let prepared = validate_path_component(group.name, "Set name")
            .map_err(|reason| Error::InvalidName { reason })
            .and_then(|()| create_dir(&folder));
        if let Err(err) = prepared {
            error!(set = %group.name, error = %err, "skipping set: cannot create its folder");
            return Ok(SetRun {
                report: None,
                failures: vec![HitFailure {
                    set: group.name.to_string(),
                    file_id: None,
                    artifact_id: None,
                    error: err,
                }],
            });
        }

        info!(set = %group.name, hits = group.hits.len(), "exporting set");
        let manifest_path = folder.join(&self.config.manifest_file_name(group.name));
        let exporter =
            Exporter::new(self.store, self.config.max_depth).reserving(manifest_path.clone());
        let mut manifest = Manifest::new(group.name, group.description);
        let mut failures = Vec::new();
        let mut exported = 0;

        for hit in group.hits {
            if self.cancel.is_cancelled() {
                warn!(set = %group.name, id = hit.file_id, "export cancelled; skipping hit");
                failures.push(HitFailure {
                    set: group.name.to_string(),
                    file_id: Some(hit.file_id),
                    artifact_id: Some(hit.artifact_id),
                    error: Error::Cancelled { id: hit.file_id },
                });
                continue;
            }

            match self.export_hit(&exporter, hit, &folder, &mut manifest) {
                Ok(saved) => {
                    exported += 1;
                    debug!(set = %group.name, id = hit.file_id, saved = %saved, "exported hit");
                }
                Err(err) => {
                    error!(
                        set = %group.name,
                        id = hit.file_id,
                        artifact_id = hit.artifact_id,
                        error = %err,
                        "failed to export hit"
                    );
                    failures.push(HitFailure {
                        set: group.name.to_string(),
                        file_id: Some(hit.file_id),
                        artifact_id: Some(hit.artifact_id),
                        error: err,
                    });
                }
            }
        }

        manifest.write(&manifest_path, self.robustness)?;

        Ok(SetRun {
            report: Some(SetReport {
                name: group.name.to_string(),
                description: group.description.to_string(),
                folder,
                manifest_path: Some(manifest_path),
                hits: group.hits.len(),
                exported,
                entries: manifest.len(),
            }),
            failures,
        })
    }

    fn export_hit(
        &self,
        exporter: &Exporter<'_>,
        hit: &Hit,
        folder: &NormalizedPath,
        manifest: &mut Manifest,
    ) -> Result<NormalizedPath> {
        let entity = self
            .store
            .entity(hit.file_id)
            .map_err(|source| Error::EntityLookup {
                id: hit.file_id,
                source,
            })?;
        if entity.is_dir() {
            exporter.export_directory(&entity, folder, manifest)
        } else {
            exporter.export_file(&entity, folder, manifest)
        }
    }
}
