//! Snapshot tests for rendered manifests.
//!
//! The temporary output root is replaced with `[ROOT]` so snapshots are
//! stable across runs.

use hits_core::{ExportConfig, Orchestrator};
use hits_fs::NormalizedPath;
use hits_test_utils::TestCase;

fn exported_manifest(case: &TestCase, set: &str) -> String {
    let store = case.load();
    let config = ExportConfig {
        output_root: Some(case.output_root()),
        ..ExportConfig::default()
    };
    Orchestrator::new(&store, &store, config)
        .unwrap()
        .export()
        .unwrap();

    let root = NormalizedPath::new(case.output_root());
    case.read_output(&format!("{set}/{set}.manifest"))
        .replace(root.as_str(), "[ROOT]")
        .trim_end()
        .to_string()
}

#[test]
fn snapshot_manifest_for_file_and_directory() {
    let mut case = TestCase::new();
    case.file(5, None, "report.txt", "q3")
        .md5(5, "9e107d9d372bb6826bd81d3542a419d6")
        .dir(42, None, "DCIM")
        .file(43, Some(42), "a.jpg", "jpeg")
        .flag(5, "Pictures", "Image & report files")
        .flag(42, "Pictures", "Image & report files");

    let xml = exported_manifest(&case, "Pictures");

    insta::assert_snapshot!(xml, @r###"
<?xml version="1.0" encoding="UTF-8"?>
<InterestingFileSet name="Pictures" description="Image &amp; report files">
  <SavedFile>
    <Path>[ROOT]/Pictures/report_5.txt</Path>
    <OriginalPath>/report.txt</OriginalPath>
    <MD5>9e107d9d372bb6826bd81d3542a419d6</MD5>
  </SavedFile>
  <SavedDirectory>
    <Path>[ROOT]/Pictures/DCIM_42/DCIM</Path>
    <OriginalPath>/DCIM</OriginalPath>
  </SavedDirectory>
  <SavedFile>
    <Path>[ROOT]/Pictures/DCIM_42/DCIM/a.jpg</Path>
    <OriginalPath>/DCIM/a.jpg</OriginalPath>
    <MD5></MD5>
  </SavedFile>
</InterestingFileSet>
"###);
}

#[test]
fn snapshot_empty_manifest() {
    let mut case = TestCase::new();
    case.missing_file(1, None, "gone.txt").flag(1, "Ghosts", "");

    let xml = exported_manifest(&case, "Ghosts");

    insta::assert_snapshot!(xml, @r###"
<?xml version="1.0" encoding="UTF-8"?>
<InterestingFileSet name="Ghosts" description="">
</InterestingFileSet>
"###);
}
