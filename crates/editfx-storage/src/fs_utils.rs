//! Crash-safe file replacement and backups.
//!
//! Writes go to a temporary file in the destination's directory and are then
//! renamed over the destination, so readers only ever see the old or the new
//! complete file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;

use crate::error::{StorageError, StorageResult};

/// Atomically replace `dst` with the bytes produced by `write`.
///
/// The parent directory is created if needed. On any failure the temporary
/// file is removed and `dst` is left untouched.
pub fn write_atomic<F>(dst: impl AsRef<Path>, write: F) -> StorageResult<()>
where
    F: FnOnce(&mut dyn Write) -> StorageResult<()>,
{
    let dst = dst.as_ref();
    let dir = parent_dir(dst);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    let tmp = NamedTempFile::new_in(&dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(dst)
        .map_err(|e| StorageError::atomic_replace(dst, e.error))?;

    tracing::debug!(path = %dst.display(), "Atomically replaced file");
    Ok(())
}

/// Copy `src` into `backup_dir` as `{stem}.backup-{YYYYmmdd-HHMMSS}{.ext}`.
pub fn backup_file(src: impl AsRef<Path>, backup_dir: impl AsRef<Path>) -> StorageResult<PathBuf> {
    let src = src.as_ref();
    let backup_dir = backup_dir.as_ref();
    if !src.exists() {
        return Err(StorageError::not_found(src));
    }
    fs::create_dir_all(backup_dir)?;

    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    let ext = src
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = Local::now().format("%Y%m%d-%H%M%S");

    let backup = backup_dir.join(format!("{}.backup-{}{}", stem, stamp, ext));
    fs::copy(src, &backup)?;

    tracing::info!(
        source = %src.display(),
        backup = %backup.display(),
        "Backed up dataset"
    );
    Ok(backup)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("nested").join("data.csv");

        write_atomic(&dst, |out| Ok(out.write_all(b"old")?)).unwrap();
        write_atomic(&dst, |out| Ok(out.write_all(b"new")?)).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
        let leftovers = fs::read_dir(dst.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files should not remain");
    }

    #[test]
    fn test_write_atomic_failure_keeps_destination() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("data.csv");
        fs::write(&dst, "intact").unwrap();

        let result = write_atomic(&dst, |out| {
            out.write_all(b"partial")?;
            Err(StorageError::missing_column("video_id"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "intact");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_backup_file_naming() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("sports_filtered.csv");
        fs::write(&src, "video_id\n1\n").unwrap();

        let backup = backup_file(&src, dir.path().join("backups")).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("sports_filtered.backup-"), "{name}");
        assert!(name.ends_with(".csv"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "video_id\n1\n");
    }

    #[test]
    fn test_backup_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = backup_file(dir.path().join("nope.csv"), dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
