//! Subcommand implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use editfx_audit::{check_records, detect_all};
use editfx_models::VideoEditAnalysis;
use editfx_review::{ReconciliationSession, ReviewPort, SessionSummary};
use editfx_storage::{
    backup_file, delete_media_for, read_report, write_report, ChangeLog, Dataset, MediaCleanup,
};

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::load(path).with_context(|| format!("Input CSV not found or unreadable: {}", path.display()))
}

/// Print one JSON object per mismatching record, then a summary line.
pub fn check(dataset: &Path, out: &mut impl Write) -> Result<usize> {
    let dataset = load_dataset(dataset)?;
    let reports = check_records(&dataset.records, dataset.detect_id_column());

    for report in &reports {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
    }
    writeln!(
        out,
        "Checked {} records; {} with mismatches.",
        dataset.len(),
        reports.len()
    )?;

    info!(records = dataset.len(), mismatched = reports.len(), "Consistency check finished");
    Ok(reports.len())
}

/// Run the anomaly rules and write the report. Returns `(total, flagged)`.
pub fn anomalies(dataset: &Path, report: &Path) -> Result<(usize, usize)> {
    let dataset = load_dataset(dataset)?;
    let id_column = dataset.detect_id_column();
    let entries = detect_all(&dataset.records, id_column);

    write_report(report, &entries, id_column)
        .with_context(|| format!("Failed to write anomaly report: {}", report.display()))?;
    Ok((dataset.len(), entries.len()))
}

/// Print the JSON Schema of the annotation object.
pub fn schema(out: &mut impl Write) -> Result<()> {
    let schema = VideoEditAnalysis::json_schema();
    writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}

/// Inputs of a review run.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub dataset: PathBuf,
    pub anomalies: PathBuf,
    pub media_dir: Option<PathBuf>,
    pub output: PathBuf,
    pub change_log: PathBuf,
    /// Copied here before an in-place run
    pub backup_dir: Option<PathBuf>,
}

impl ReviewOptions {
    fn in_place(&self) -> bool {
        self.output == self.dataset
    }
}

/// Reconcile every record listed in the anomaly report through `port`.
pub fn review<P: ReviewPort>(options: &ReviewOptions, port: P) -> Result<SessionSummary> {
    let dataset = load_dataset(&options.dataset)?;
    let queue = read_report(&options.anomalies)
        .with_context(|| format!("Anomaly CSV not usable: {}", options.anomalies.display()))?;

    if options.in_place() {
        if let Some(dir) = &options.backup_dir {
            backup_file(&options.dataset, dir).context("Failed to back up dataset")?;
        }
    }

    let session = ReconciliationSession::new(
        dataset,
        &options.output,
        ChangeLog::new(&options.change_log),
        port,
    )
    .with_context(|| {
        format!(
            "Could not detect a video id column in {}",
            options.dataset.display()
        )
    })?;
    let mut session = match &options.media_dir {
        Some(dir) if dir.is_dir() => session.with_media_dir(dir),
        Some(dir) => {
            warn!(dir = %dir.display(), "Media directory not found; reviewing without media");
            session
        }
        None => session,
    };

    Ok(session.run(&queue))
}

/// Drop duplicate ids keeping the first. Returns the number removed.
pub fn dedupe(dataset_path: &Path, output: &Path, backup_dir: Option<&Path>) -> Result<usize> {
    let mut dataset = load_dataset(dataset_path)?;
    let id_column = dataset
        .require_id_column()
        .context("'video_id' column is required in the CSV")?;

    if output == dataset_path {
        if let Some(dir) = backup_dir {
            backup_file(dataset_path, dir).context("Failed to back up dataset")?;
        }
    }

    let removed = dataset.dedupe(&id_column);
    dataset.save(output)?;
    info!(removed, remaining = dataset.len(), "Removed duplicate rows");
    Ok(removed)
}

/// Outcome of [`prune`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub kept: usize,
    pub removed: usize,
    pub media: Option<MediaCleanup>,
}

/// Remove rows with no visual edit effect, optionally deleting their media.
pub fn prune(
    dataset_path: &Path,
    backup_dir: Option<&Path>,
    media_dir: Option<&Path>,
    delete_media: bool,
) -> Result<PruneSummary> {
    let mut dataset = load_dataset(dataset_path)?;
    let id_column = dataset
        .require_id_column()
        .context("'video_id' column is required in the CSV")?;

    if let Some(dir) = backup_dir {
        backup_file(dataset_path, dir).context("Failed to back up dataset")?;
    }

    let before = dataset.len();
    let removed_ids = dataset.prune_effectless(Some(&id_column));
    dataset.save(dataset_path)?;

    let mut summary = PruneSummary {
        kept: dataset.len(),
        removed: before - dataset.len(),
        media: None,
    };

    if delete_media {
        let Some(dir) = media_dir else {
            bail!("--delete-media needs a media directory (set VIDEO_CATEGORY or --media-dir)");
        };
        if dir.is_dir() {
            summary.media = Some(delete_media_for(dir, &removed_ids)?);
        } else {
            warn!(dir = %dir.display(), "Video directory not found; skipping file deletions");
        }
    }

    Ok(summary)
}
