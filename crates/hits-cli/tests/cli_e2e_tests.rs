//! End-to-end tests that invoke the compiled `hits` binary.

use assert_cmd::Command;
use hits_test_utils::TestCase;
use predicates::prelude::*;

fn hits() -> Command {
    let mut cmd = Command::cargo_bin("hits").expect("Failed to find hits binary");
    cmd.env_remove("HITS_CATALOG").env_remove("HITS_OUT_DIR").env_remove("RUST_LOG");
    cmd
}

fn sample_case() -> TestCase {
    let mut case = TestCase::new();
    case.dir(42, None, "Photos")
        .file(43, Some(42), "a.jpg", "jpeg")
        .file(5, None, "report.txt", "five")
        .flag(42, "Pictures", "Image files")
        .flag(5, "Docs", "Documents");
    case
}

#[test]
fn test_help_exits_zero() {
    hits()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_export_success_exits_zero() {
    let case = sample_case();
    let catalog = case.write_catalog();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(case.output_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pictures"))
        .stdout(predicate::str::contains("OK"));

    case.assert_output_file("Pictures/Photos_42/Photos/a.jpg", "jpeg");
    case.assert_output_file("Docs/report_5.txt", "five");
    assert!(case.output_root().join("Docs/Docs.manifest").is_file());
}

#[test]
fn test_export_partial_failure_exits_two() {
    let mut case = sample_case();
    case.missing_file(6, None, "gone.txt").flag(6, "Docs", "Documents");
    let catalog = case.write_catalog();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(case.output_root())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failures"));

    case.assert_output_file("Docs/report_5.txt", "five");
}

#[test]
fn test_export_json_report() {
    let case = sample_case();
    let catalog = case.write_catalog();

    let output = hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(case.output_root())
        .arg("--jobs")
        .arg("2")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "success");
    assert_eq!(report["sets"].as_array().unwrap().len(), 2);
    assert_eq!(report["sets"][0]["name"], "Docs");
    assert_eq!(report["sets"][1]["entries"], 2);
}

#[test]
fn test_export_uses_out_dir_template() {
    let case = sample_case();
    let catalog = case.write_catalog();
    let out_dir = case.root().join("host");

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("InterestingFiles/Docs/report_5.txt").is_file());
}

#[test]
fn test_export_without_output_location_fails() {
    let case = sample_case();
    let catalog = case.write_catalog();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("#OUT_DIR#"));
}

#[test]
fn test_export_reads_settings_file() {
    let case = sample_case();
    let catalog = case.write_catalog();
    let settings = case.root().join("export.toml");
    std::fs::write(&settings, "manifest_extension = \"xml\"\n").unwrap();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(case.output_root())
        .arg("--config")
        .arg(&settings)
        .assert()
        .success();

    assert!(case.output_root().join("Docs/Docs.xml").is_file());
}

#[test]
fn test_export_rejects_zero_jobs() {
    let case = sample_case();
    let catalog = case.write_catalog();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(case.output_root())
        .arg("--jobs")
        .arg("0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));

    case.assert_output_missing("Docs");
}

#[test]
fn test_missing_catalog_is_an_error() {
    let case = TestCase::new();

    hits()
        .arg("export")
        .arg("--catalog")
        .arg(case.root().join("nope.toml"))
        .arg("--output")
        .arg(case.output_root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Catalog not found"));
}

#[test]
fn test_sets_json_lists_sets_in_order() {
    let mut case = sample_case();
    case.malformed_hit(5);
    let catalog = case.write_catalog();

    let output = hits()
        .arg("sets")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["sets"][0]["name"], "Docs");
    assert_eq!(listing["sets"][1]["name"], "Pictures");
    assert_eq!(listing["sets"][1]["description"], "Image files");
    assert_eq!(listing["skipped_records"][0], 3);
}

#[test]
fn test_sets_human_output() {
    let case = sample_case();
    let catalog = case.write_catalog();

    hits()
        .arg("sets")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pictures"))
        .stdout(predicate::str::contains("Documents"));

    assert!(!case.output_root().exists());
}

#[test]
fn test_completions_bash() {
    hits()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("hits"));
}
