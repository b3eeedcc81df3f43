//! Estimate End Dates - research project maintenance
//!
//! Reads project UUIDs from a spreadsheet, looks up each project's start date
//! through the projects API and, for projects that have no end date yet,
//! writes a presumed end date (start year + 3) and attaches a note saying so.

pub mod audit;
pub mod client;
pub mod end_date;
pub mod operator;
pub mod orchestrator;
pub mod source;

pub use audit::AuditLog;
pub use client::{ApiError, Credentials, ProjectApi, ProjectRecord, PureClient};
pub use end_date::{compute_end_date, EndDateError};
pub use operator::{confirm, execute, prompt_credentials, Operator, OperatorError, Terminal};
pub use orchestrator::{Orchestrator, RunSummary, UpdateResult, NOTE_TEXT};
pub use source::{read_identifiers, SourceReadError};
