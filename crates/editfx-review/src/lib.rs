//! Interactive reconciliation of flagged annotation records.
//!
//! This crate provides:
//! - The reconciliation session state machine
//! - The `ReviewPort` operator boundary with terminal and scripted ports
//! - Field prompt parsing
//! - Structured session logging

pub mod editor;
pub mod error;
pub mod logging;
pub mod port;
pub mod session;

pub use error::{ReviewError, ReviewResult};
pub use logging::SessionLogger;
pub use port::{open_external, Decision, ReviewPort, ReviewPrompt, ScriptedPort, TerminalPort};
pub use session::{ReconciliationSession, RecordOutcome, SessionSummary};
