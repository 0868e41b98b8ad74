//! The reconciliation session.
//!
//! Each flagged record goes through
//! `LOCATE -> PRESENT -> DECIDE -> EDIT_FIELDS -> VALIDATE -> PERSIST`.
//! The dataset is rewritten after every edited record and a change log line
//! is appended whenever a field actually changed.

use std::path::{Path, PathBuf};

use editfx_models::schema::{field, governing_flag, presence_flags};
use editfx_models::{
    apply_dependency_clear, enforce_dependencies, validate, AnomalyEntry, ChangeLogEntry, FieldKind,
    FieldSpec, FieldValues, DEPENDENCY_GRAPH, FIELDS,
};
use editfx_storage::{find_media, ChangeLog, Dataset};

use crate::editor::prompt_field;
use crate::error::{ReviewError, ReviewResult};
use crate::logging::SessionLogger;
use crate::port::{Decision, ReviewPort, ReviewPrompt};

/// How one queued record ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    NotFound,
    Skipped,
    Quit,
    /// Edited and persisted; `changes` counts fields that changed.
    Reconciled { changes: usize },
}

/// Totals for a finished (or quit) session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queued: usize,
    pub reconciled: usize,
    /// Reconciled records with at least one changed field
    pub changed: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed: usize,
    pub quit: bool,
}

/// Operator-driven reconciliation over a queue of flagged records.
pub struct ReconciliationSession<P: ReviewPort> {
    dataset: Dataset,
    id_column: String,
    output: PathBuf,
    media_dir: Option<PathBuf>,
    change_log: ChangeLog,
    port: P,
    logger: SessionLogger,
}

impl<P: ReviewPort> ReconciliationSession<P> {
    /// Prepare a session writing the reconciled dataset to `output`.
    ///
    /// Missing schema columns are added to the dataset so edits can be stored.
    pub fn new(
        mut dataset: Dataset,
        output: impl Into<PathBuf>,
        change_log: ChangeLog,
        port: P,
    ) -> ReviewResult<Self> {
        let id_column = dataset
            .detect_id_column()
            .map(str::to_string)
            .ok_or(ReviewError::NoIdColumn)?;
        dataset.ensure_schema_columns();

        let output = output.into();
        let logger = SessionLogger::new(&output.display().to_string());

        Ok(Self {
            dataset,
            id_column,
            output,
            media_dir: None,
            change_log,
            port,
            logger,
        })
    }

    /// Look up media for each record under `dir`.
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Work through `queue` in order until it is exhausted or the operator quits.
    ///
    /// Per-record failures are logged and counted; they never stop the loop.
    pub fn run(&mut self, queue: &[AnomalyEntry]) -> SessionSummary {
        let mut summary = SessionSummary {
            queued: queue.len(),
            ..Default::default()
        };
        self.logger.log_start(queue.len());
        self.port
            .notice(&format!("Loaded {} anomalies. Starting review...", queue.len()));

        for (idx, entry) in queue.iter().enumerate() {
            if entry.video_id.is_empty() {
                continue;
            }
            let span = self.logger.create_span(&entry.video_id, idx + 1);
            let _guard = span.enter();

            match self.review_record(idx + 1, queue.len(), entry) {
                Ok(RecordOutcome::NotFound) => summary.not_found += 1,
                Ok(RecordOutcome::Skipped) => summary.skipped += 1,
                Ok(RecordOutcome::Quit) => {
                    summary.quit = true;
                    break;
                }
                Ok(RecordOutcome::Reconciled { changes }) => {
                    summary.reconciled += 1;
                    if changes > 0 {
                        summary.changed += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    self.logger.log_error(&entry.video_id, &e.to_string());
                    self.port
                        .notice(&format!("Error on {}: {} (continuing)", entry.video_id, e));
                }
            }
        }

        self.logger.log_completion(&format!(
            "reconciled={} changed={} skipped={} not_found={} failed={} quit={}",
            summary.reconciled,
            summary.changed,
            summary.skipped,
            summary.not_found,
            summary.failed,
            summary.quit
        ));
        if summary.changed == 0 {
            self.port
                .notice("No edits were made; no change log entries created.");
        }
        summary
    }

    /// Run one queued record through the state machine.
    pub fn review_record(
        &mut self,
        position: usize,
        total: usize,
        entry: &AnomalyEntry,
    ) -> ReviewResult<RecordOutcome> {
        let video_id = &entry.video_id;

        let Some(row) = self.dataset.position(&self.id_column, video_id) else {
            self.port.notice(&format!(
                "[{}/{}] Video ID in anomalies not found in dataset: {}",
                position, total, video_id
            ));
            self.logger.log_warning(video_id, "not found in dataset");
            return Ok(RecordOutcome::NotFound);
        };

        let media = self
            .media_dir
            .as_deref()
            .and_then(|dir| find_media(dir, video_id));
        let prompt = ReviewPrompt {
            video_id,
            position,
            total,
            reason: entry.anomalies_joined.trim(),
            media: media.as_deref(),
        };

        match self.port.decide(&prompt)? {
            Decision::Skip => {
                self.port.notice("Skipped row.");
                self.logger.log_record(video_id, "skipped");
                return Ok(RecordOutcome::Skipped);
            }
            Decision::Quit => {
                self.port.notice("Quitting review.");
                self.logger.log_record(video_id, "operator quit");
                return Ok(RecordOutcome::Quit);
            }
            Decision::Edit => {}
        }

        let mut values = FieldValues::from_record(&self.dataset.records[row]);
        let mut log_entry = ChangeLogEntry::new(video_id.clone());

        self.port.notice("\n--- Edit values (Enter = keep current) ---");
        self.edit_fields(&mut values, &mut log_entry)?;

        for (name, old) in enforce_dependencies(&mut values) {
            if let Some(new) = values.get(name).cloned() {
                log_entry.record(name, old, new);
            }
        }

        if let Some(warning) = validate(&values) {
            self.port.notice(&format!("[Validation warning] {}", warning));
            self.logger.log_warning(video_id, &format!("validation: {}", warning));
        }

        // Only fields the operator answered or a cleared flag reset are
        // written; every other cell keeps its original text.
        let touched: Vec<String> = log_entry.changes.keys().cloned().collect();
        log_entry.prune_noops();
        values.write_into(&mut self.dataset.records[row], touched.iter().map(String::as_str));
        self.port.notice("Row updated.");

        self.dataset.save(&self.output)?;
        self.port
            .notice(&format!("Saved CSV to {}", self.output.display()));

        let changes = log_entry.changes.len();
        if changes > 0 {
            self.change_log.append(&log_entry)?;
        }
        self.logger
            .log_record(video_id, &format!("reconciled with {} changed fields", changes));

        Ok(RecordOutcome::Reconciled { changes })
    }

    /// Offer every editable field in dependency-safe order.
    ///
    /// Flags come first and clear their dependents as soon as they turn false.
    /// Dependents are then offered only for flags that are true, followed by
    /// the remaining ungated fields.
    fn edit_fields(
        &mut self,
        values: &mut FieldValues,
        log_entry: &mut ChangeLogEntry,
    ) -> ReviewResult<()> {
        for flag in presence_flags() {
            let Some(spec) = field(flag) else { continue };
            let Some(new) = self.edit_one(values, log_entry, spec)? else {
                continue;
            };

            for (name, old) in apply_dependency_clear(values, flag, new) {
                if let Some(cleared) = values.get(name).cloned() {
                    log_entry.record(name, old, cleared);
                }
            }
        }

        for (flag, deps) in DEPENDENCY_GRAPH {
            if !values.flag(flag) {
                continue;
            }
            for dep in deps.iter() {
                if let Some(spec) = field(dep) {
                    self.edit_one(values, log_entry, spec)?;
                }
            }
        }

        let ungated = FIELDS
            .iter()
            .filter(|f| f.kind != FieldKind::Bool && governing_flag(f.name).is_none());
        for spec in ungated {
            self.edit_one(values, log_entry, spec)?;
        }

        Ok(())
    }

    /// Prompt for one field and apply the answer.
    ///
    /// Returns the field's resulting truth value when it changed.
    fn edit_one(
        &mut self,
        values: &mut FieldValues,
        log_entry: &mut ChangeLogEntry,
        spec: &FieldSpec,
    ) -> ReviewResult<Option<bool>> {
        let current = values
            .get(spec.name)
            .cloned()
            .unwrap_or_else(|| spec.kind.empty_value());

        match prompt_field(&mut self.port, spec, &current)? {
            Some(new) => {
                let truth = new.as_bool();
                values.set(spec.name, new.clone());
                log_entry.record(spec.name, current, new);
                Ok(Some(truth))
            }
            None => Ok(None),
        }
    }
}
