//! Dataset persistence for EditFX.
//!
//! This crate provides:
//! - CSV record tables with id column detection and schema backfill
//! - Atomic file replacement and timestamped backups
//! - Anomaly report and change log files
//! - Media file lookup by video id

pub mod anomaly_report;
pub mod change_log;
pub mod dataset;
pub mod error;
pub mod fs_utils;
pub mod media;

pub use anomaly_report::{read_report, write_report, ROW_INDEX_COLUMN};
pub use change_log::ChangeLog;
pub use dataset::{Dataset, ID_COLUMN_CANDIDATES, VISUAL_EFFECT_FLAGS};
pub use error::{StorageError, StorageResult};
pub use fs_utils::{backup_file, write_atomic};
pub use media::{delete_media_for, find_media, MediaCleanup, VIDEO_EXTENSIONS};
