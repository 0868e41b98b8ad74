//! Curation configuration.

use std::path::PathBuf;

/// Paths and switches shared by every subcommand.
///
/// Dataset locations derive from the video category (genre) using the
/// directory layout of the curation workspace.
#[derive(Debug, Clone)]
pub struct CurateConfig {
    /// Video category, e.g. `education`
    pub genre: Option<String>,
    /// Append-only change log written by `review`
    pub change_log: PathBuf,
    /// Launch the platform viewer for located media during review
    pub open_media: bool,
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            genre: None,
            change_log: PathBuf::from("edits_log.jsonl"),
            open_media: true,
        }
    }
}

impl CurateConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            genre: std::env::var("VIDEO_CATEGORY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            change_log: std::env::var("EDITFX_CHANGE_LOG")
                .ok()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("edits_log.jsonl")),
            open_media: std::env::var("EDITFX_OPEN_MEDIA")
                .ok()
                .and_then(|s| s.to_lowercase().parse().ok())
                .unwrap_or(true),
        }
    }

    /// Replace the genre when one is given explicitly.
    pub fn with_genre(mut self, genre: Option<String>) -> Self {
        if let Some(genre) = genre.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()) {
            self.genre = Some(genre);
        }
        self
    }

    /// `filtered/{genre}_filtered.csv`
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.genre
            .as_ref()
            .map(|g| PathBuf::from("filtered").join(format!("{}_filtered.csv", g)))
    }

    /// `anomalies/{genre}_anomalies.csv`
    pub fn anomalies_path(&self) -> Option<PathBuf> {
        self.genre
            .as_ref()
            .map(|g| PathBuf::from("anomalies").join(format!("{}_anomalies.csv", g)))
    }

    /// `kept_{genre}_videos`
    pub fn media_dir(&self) -> Option<PathBuf> {
        self.genre
            .as_ref()
            .map(|g| PathBuf::from(format!("kept_{}_videos", g)))
    }

    /// `backups/{genre}`
    pub fn backup_dir(&self) -> Option<PathBuf> {
        self.genre.as_ref().map(|g| PathBuf::from("backups").join(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_genre() {
        let config = CurateConfig::default().with_genre(Some(" sports ".to_string()));
        assert_eq!(
            config.dataset_path(),
            Some(PathBuf::from("filtered/sports_filtered.csv"))
        );
        assert_eq!(
            config.anomalies_path(),
            Some(PathBuf::from("anomalies/sports_anomalies.csv"))
        );
        assert_eq!(config.media_dir(), Some(PathBuf::from("kept_sports_videos")));
        assert_eq!(config.backup_dir(), Some(PathBuf::from("backups/sports")));
    }

    #[test]
    fn test_no_genre_no_paths() {
        let config = CurateConfig::default().with_genre(Some("  ".to_string()));
        assert!(config.genre.is_none());
        assert!(config.dataset_path().is_none());
        assert_eq!(config.change_log, PathBuf::from("edits_log.jsonl"));
        assert!(config.open_media);
    }
}
