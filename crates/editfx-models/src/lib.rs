//! Shared data models for EditFX.
//!
//! This crate provides:
//! - Raw dataset rows and video identity
//! - Closed vocabularies for categorical annotation fields
//! - The annotation field schema and presence-flag dependency graph
//! - Default coercion of loosely typed cells
//! - Mismatch, anomaly and change log entry types

pub mod analysis;
pub mod coerce;
pub mod literal;
pub mod record;
pub mod report;
pub mod schema;
pub mod vocabulary;

// Re-export common types
pub use analysis::{validate, VideoEditAnalysis};
pub use record::{AnnotationRecord, VideoId};
pub use report::{AnomalyEntry, ChangeLogEntry, FieldChange, MismatchReport, MismatchValue};
pub use schema::{
    apply_dependency_clear, enforce_dependencies, FieldKind, FieldSpec, FieldValue, FieldValues,
    DEPENDENCY_GRAPH, FIELDS,
};
pub use vocabulary::{Vocabulary, VocabularyKind};
