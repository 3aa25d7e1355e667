//! Directory creation, content copy and atomic writes

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Tunables for atomic writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to wait for the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Flush the temp file to disk before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Create `path` and any missing parents.
///
/// Succeeds if the directory already exists. Fails with
/// [`Error::NotADirectory`] when something other than a directory
/// occupies the path.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    if native.is_dir() {
        return Ok(());
    }
    if native.exists() {
        return Err(Error::NotADirectory { path: native });
    }
    fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))?;
    tracing::trace!(path = %path, "created directory");
    Ok(())
}

/// Copy the bytes of `source` to `dest`, replacing any existing file.
///
/// Returns the number of bytes copied.
pub fn copy_file(source: &Path, dest: &NormalizedPath) -> Result<u64> {
    let native = dest.to_native();
    fs::copy(source, &native).map_err(|e| Error::io(source, e))
}

/// Write `content` to `dest`, replacing any existing file.
pub fn write_bytes(dest: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native = dest.to_native();
    fs::write(&native, content).map_err(|e| Error::io(&native, e))
}

/// Write content atomically to a file with locking.
///
/// Writes to a temp file in the same directory, holding an exclusive
/// advisory lock on it, then renames it over the target.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = native_path.with_file_name(format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    ));

    let result = (|| {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io(&temp_path, e))?;
        acquire_lock(&temp_file, &native_path, config.lock_timeout)?;
        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;
        if config.enable_fsync {
            temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
        }
        FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;
        drop(temp_file);
        fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn acquire_lock(lock_file: &File, target: &Path, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        match lock_file.try_lock_exclusive() {
            Ok(()) => return Ok(()),
            Err(_) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(10)),
            Err(_) => {
                return Err(Error::LockFailed {
                    path: target.to_path_buf(),
                });
            }
        }
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Resolve `path` to an absolute path without Windows verbatim prefixes.
pub fn canonicalize(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native = path.to_native();
    dunce::canonicalize(&native)
        .map(NormalizedPath::from)
        .map_err(|e| Error::io(&native, e))
}
