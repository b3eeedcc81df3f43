//! Per-identifier update pipeline: fetch, decide, compute, write, annotate.
//!
//! Identifiers are processed strictly in order, one at a time. Network and
//! parse failures are logged and never abort the run.

use std::io::{self, Write};

use crate::audit::AuditLog;
use crate::client::{ApiError, ProjectApi};
use crate::end_date::compute_end_date;

pub const NOTE_TEXT: &str =
    "Project is presumed inactive, and an estimated end date has been assigned.";

/// Terminal outcome for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    Updated,
    SkippedHasEndDate,
    SkippedNoStartDate,
    FetchFailed,
    /// The end date write failed; the note was still attempted.
    UpdateFailed,
    /// The end date was written but the note was not.
    NoteFailed,
}

impl UpdateResult {
    /// Whether the end date write was attempted for this identifier.
    pub fn counts_as_modified(self) -> bool {
        matches!(
            self,
            UpdateResult::Updated | UpdateResult::UpdateFailed | UpdateResult::NoteFailed
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifiers whose end date write was attempted, confirmed or not.
    pub modified: usize,
    pub updated: usize,
    pub skipped_has_end_date: usize,
    pub skipped_no_start_date: usize,
    pub fetch_failed: usize,
    pub update_failed: usize,
    pub note_failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: UpdateResult) {
        if result.counts_as_modified() {
            self.modified += 1;
        }
        let counter = match result {
            UpdateResult::Updated => &mut self.updated,
            UpdateResult::SkippedHasEndDate => &mut self.skipped_has_end_date,
            UpdateResult::SkippedNoStartDate => &mut self.skipped_no_start_date,
            UpdateResult::FetchFailed => &mut self.fetch_failed,
            UpdateResult::UpdateFailed => &mut self.update_failed,
            UpdateResult::NoteFailed => &mut self.note_failed,
        };
        *counter += 1;
    }

    pub fn processed(&self) -> usize {
        self.updated
            + self.skipped_has_end_date
            + self.skipped_no_start_date
            + self.fetch_failed
            + self.update_failed
            + self.note_failed
    }
}

pub struct Orchestrator<'a, A, W: Write> {
    api: &'a A,
    audit: &'a mut AuditLog<W>,
    username: &'a str,
}

impl<'a, A: ProjectApi, W: Write> Orchestrator<'a, A, W> {
    pub fn new(api: &'a A, audit: &'a mut AuditLog<W>, username: &'a str) -> Self {
        Self {
            api,
            audit,
            username,
        }
    }

    /// Processes every identifier in order. Only audit log write failures
    /// are returned as errors.
    pub async fn run(&mut self, ids: &[String]) -> io::Result<RunSummary> {
        self.audit.info("Script execution started.")?;

        let mut summary = RunSummary::default();
        for id in ids {
            let result = self.process(id).await?;
            summary.record(result);
        }

        self.audit
            .warn(&format!("Total projects modified: {}", summary.modified))?;
        self.audit.info("Script execution finished.")?;
        Ok(summary)
    }

    pub async fn process(&mut self, id: &str) -> io::Result<UpdateResult> {
        let record = match self.api.fetch_project(id).await {
            Ok(record) => {
                self.audit
                    .info(&format!("Successfully fetched data for UUID: {}", id))?;
                record
            }
            Err(ApiError::Parse(reason)) => {
                self.audit.warn(&format!(
                    "Unreadable project data for UUID: {} - {}",
                    id, reason
                ))?;
                self.audit
                    .warn(&format!("No start date found for UUID: {}", id))?;
                return Ok(UpdateResult::SkippedNoStartDate);
            }
            Err(e) => {
                self.audit.warn(&format!(
                    "Failed to fetch data for UUID: {} - Status Code: {}",
                    id,
                    e.status_text()
                ))?;
                return Ok(UpdateResult::FetchFailed);
            }
        };

        let Some(start_date) = record.start_date() else {
            self.audit
                .warn(&format!("No start date found for UUID: {}", id))?;
            return Ok(UpdateResult::SkippedNoStartDate);
        };

        if record.has_end_date() {
            self.audit.info(&format!(
                "End date already exists for UUID: {}, skipping update.",
                id
            ))?;
            return Ok(UpdateResult::SkippedHasEndDate);
        }

        let end_date = match compute_end_date(start_date) {
            Ok(end_date) => end_date,
            Err(e) => {
                self.audit
                    .warn(&format!("Cannot estimate end date for UUID: {} - {}", id, e))?;
                return Ok(UpdateResult::SkippedNoStartDate);
            }
        };

        let written = match self.api.write_end_date(id, start_date, &end_date).await {
            Ok(()) => {
                self.audit.info(&format!(
                    "Successfully updated end date for UUID: {} - Start Date: {}, End Date: {}",
                    id, start_date, end_date
                ))?;
                true
            }
            Err(e) => {
                self.audit.warn(&format!(
                    "Failed to update end date for UUID: {} - Status Code: {}",
                    id,
                    e.status_text()
                ))?;
                false
            }
        };

        // The note goes out even when the date write failed.
        let noted = match self.api.add_note(id, NOTE_TEXT, self.username).await {
            Ok(()) => {
                self.audit
                    .info(&format!("Successfully added note for UUID: {}", id))?;
                true
            }
            Err(e) => {
                self.audit.warn(&format!(
                    "Failed to add note for UUID: {} - Status Code: {}",
                    id,
                    e.status_text()
                ))?;
                false
            }
        };

        Ok(match (written, noted) {
            (true, true) => UpdateResult::Updated,
            (false, _) => UpdateResult::UpdateFailed,
            (true, false) => UpdateResult::NoteFailed,
        })
    }
}
