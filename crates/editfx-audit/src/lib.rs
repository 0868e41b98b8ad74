//! Annotation consistency auditing.
//!
//! This crate provides:
//! - Literal marker grammar and narrative text extraction
//! - The consistency checker (structured predictions vs. narrative markers)
//! - The heuristic anomaly detector
//!
//! Both passes are pure reads over dataset rows and are safe to re-run.

pub mod anomaly;
pub mod consistency;
pub mod markers;

pub use anomaly::{detect, detect_all, OVERUSE_THRESHOLD};
pub use consistency::{check_record, check_records, narrative_of};
pub use markers::{count_start_tags, extract_full_text, tag_present, EffectDefinition, Marker, EFFECTS};
