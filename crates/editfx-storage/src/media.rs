//! Media file lookup by video id.

use std::fs;
use std::path::{Path, PathBuf};

use editfx_models::VideoId;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::StorageResult;

/// Recognized video extensions, in lookup priority order.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm", "m4v"];

fn video_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => return Vec::new(),
    };
    entries.sort();
    entries
}

/// Locate the media file for `video_id` directly under `dir`.
///
/// An exact `{id}.{ext}` name wins; otherwise any file whose stem contains
/// the id. Extensions are tried in [`VIDEO_EXTENSIONS`] order.
pub fn find_media(dir: impl AsRef<Path>, video_id: &VideoId) -> Option<PathBuf> {
    let dir = dir.as_ref();
    let id = video_id.as_str();
    if id.is_empty() {
        return None;
    }

    let candidates: Vec<(PathBuf, String, String)> = sorted_entries(dir)
        .into_iter()
        .filter(|p| p.is_file())
        .filter_map(|p| {
            let ext = video_extension(&p)?;
            let stem = p.file_stem()?.to_string_lossy().into_owned();
            Some((p, stem, ext))
        })
        .collect();

    for ext in VIDEO_EXTENSIONS {
        if let Some((path, _, _)) = candidates.iter().find(|(_, stem, e)| e == ext && stem == id) {
            return Some(path.clone());
        }
    }
    for ext in VIDEO_EXTENSIONS {
        if let Some((path, _, _)) = candidates.iter().find(|(_, stem, e)| e == ext && stem.contains(id)) {
            debug!(video_id = %video_id, path = %path.display(), "Matched media by substring");
            return Some(path.clone());
        }
    }
    None
}

/// Outcome of [`delete_media_for`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCleanup {
    pub deleted: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Recursively delete video files whose stem contains any of `ids`.
///
/// Symlinks are not followed, so only files inside `dir` are touched.
pub fn delete_media_for(dir: impl AsRef<Path>, ids: &[VideoId]) -> StorageResult<MediaCleanup> {
    let mut cleanup = MediaCleanup::default();

    let walker = WalkDir::new(dir.as_ref())
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable media entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if video_extension(path).is_none() {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let matched = ids.iter().any(|id| !id.is_empty() && stem.contains(id.as_str()));
        if !matched {
            cleanup.kept += 1;
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => cleanup.deleted += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not delete media file");
                cleanup.failed += 1;
            }
        }
    }

    Ok(cleanup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "0042_abc123_final.mp4");
        let exact = touch(dir.path(), "abc123.mov");

        assert_eq!(find_media(dir.path(), &VideoId::from("abc123")), Some(exact));
    }

    #[test]
    fn test_substring_match_and_extension_filter() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "abc123.txt");
        let hit = touch(dir.path(), "clip-abc123-v2.WEBM");

        assert_eq!(find_media(dir.path(), &VideoId::from("abc123")), Some(hit));
        assert_eq!(find_media(dir.path(), &VideoId::from("zzz")), None);
        assert_eq!(find_media(dir.path().join("missing"), &VideoId::from("abc123")), None);
    }

    #[test]
    fn test_delete_media_for_recurses() {
        let dir = TempDir::new().unwrap();
        let gone = touch(dir.path(), "sub/x_bad1.mp4");
        let kept = touch(dir.path(), "good.mkv");
        touch(dir.path(), "bad1.json");

        let cleanup = delete_media_for(dir.path(), &[VideoId::from("bad1")]).unwrap();
        assert_eq!(cleanup, MediaCleanup { deleted: 1, kept: 1, failed: 0 });
        assert!(!gone.exists());
        assert!(kept.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_media_for_ignores_symlinked_dirs() {
        let root = TempDir::new().unwrap();
        let kept_dir = root.path().join("kept");
        let outside = touch(root.path(), "elsewhere/bad1.mp4");
        let inside = touch(&kept_dir, "bad1.mp4");
        std::os::unix::fs::symlink(&kept_dir, kept_dir.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.path().join("elsewhere"), kept_dir.join("ext")).unwrap();

        let cleanup = delete_media_for(&kept_dir, &[VideoId::from("bad1")]).unwrap();
        assert_eq!(cleanup, MediaCleanup { deleted: 1, kept: 0, failed: 0 });
        assert!(!inside.exists());
        assert!(outside.exists());
    }
}
