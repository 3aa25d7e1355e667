use assert_fs::prelude::*;
use hits_fs::{Error, NormalizedPath, RobustnessConfig, io};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn ensure_dir_creates_nested_directories() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("a").join("b").join("c");

    io::ensure_dir(&path).unwrap();

    temp.child("a/b/c").assert(predicate::path::is_dir());
}

#[test]
fn ensure_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("out");

    io::ensure_dir(&path).unwrap();
    io::ensure_dir(&path).unwrap();

    assert!(path.is_dir());
}

#[test]
fn ensure_dir_rejects_existing_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("occupied").touch().unwrap();
    let path = NormalizedPath::new(temp.child("occupied").path());

    let result = io::ensure_dir(&path);

    assert!(matches!(result, Err(Error::NotADirectory { .. })));
}

#[test]
fn copy_file_replicates_bytes() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("source.bin");
    source.write_binary(&[0, 1, 2, 255]).unwrap();
    let dest = NormalizedPath::new(temp.path()).join("dest.bin");

    let copied = io::copy_file(source.path(), &dest).unwrap();

    assert_eq!(copied, 4);
    assert_eq!(fs::read(dest.to_native()).unwrap(), vec![0, 1, 2, 255]);
}

#[test]
fn copy_file_missing_source_reports_source_path() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("missing.txt");
    let dest = NormalizedPath::new(temp.path()).join("dest.txt");

    let err = io::copy_file(&source, &dest).unwrap_err();

    assert!(err.to_string().contains("missing.txt"), "got: {err}");
}

#[test]
fn write_atomic_creates_parents_and_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("set").join("set.manifest");

    io::write_atomic(&path, b"<doc/>", RobustnessConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(path.to_native()).unwrap(), "<doc/>");
    let leftovers: Vec<_> = fs::read_dir(temp.path().join("set"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {leftovers:?}");
}

#[test]
fn write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("report.manifest");
    fs::write(&file_path, "original").unwrap();

    let config = RobustnessConfig {
        enable_fsync: false,
        ..RobustnessConfig::default()
    };
    io::write_atomic(&NormalizedPath::new(&file_path), b"updated", config).unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    assert!(io::read_text(&path).is_err());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn ensure_dir_under_readonly_parent_fails() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let temp = TempDir::new().unwrap();
        let readonly = temp.path().join("readonly");
        fs::create_dir(&readonly).unwrap();
        fs::set_permissions(&readonly, Permissions::from_mode(0o555)).unwrap();

        let result = io::ensure_dir(&NormalizedPath::new(readonly.join("child")));

        let _ = fs::set_permissions(&readonly, Permissions::from_mode(0o755));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
