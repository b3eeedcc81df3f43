//! Full pass over a spreadsheet against an in-memory projects API.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;

use estimate_end_dates::client::Period;
use estimate_end_dates::{
    execute, read_identifiers, ApiError, AuditLog, Operator, ProjectApi, ProjectRecord, NOTE_TEXT,
};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

#[derive(Default)]
struct FakeProjects {
    records: HashMap<String, ProjectRecord>,
    writes: RefCell<Vec<(String, String, String)>>,
    notes: RefCell<Vec<(String, String, String)>>,
}

impl FakeProjects {
    fn insert(&mut self, id: &str, start: Option<&str>, end: Option<&str>) {
        self.records.insert(
            id.to_string(),
            ProjectRecord {
                period: Some(Period {
                    start_date: start.map(str::to_string),
                    end_date: end.map(|end| Some(end.to_string())),
                }),
            },
        );
    }
}

impl ProjectApi for FakeProjects {
    async fn fetch_project(&self, id: &str) -> Result<ProjectRecord, ApiError> {
        self.records
            .get(id)
            .cloned()
            .ok_or(ApiError::Status { status: 404 })
    }

    async fn write_end_date(
        &self,
        id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<(), ApiError> {
        self.writes
            .borrow_mut()
            .push((id.to_string(), start_date.to_string(), end_date.to_string()));
        Ok(())
    }

    async fn add_note(&self, id: &str, text: &str, username: &str) -> Result<(), ApiError> {
        self.notes
            .borrow_mut()
            .push((id.to_string(), text.to_string(), username.to_string()));
        Ok(())
    }
}

struct Answers(VecDeque<&'static str>);

impl Operator for Answers {
    fn ask(&mut self, _prompt: &str) -> io::Result<String> {
        self.0
            .pop_front()
            .map(str::to_string)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.ask(prompt)
    }

    fn say(&mut self, _message: &str) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn three_projects_one_modified() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("enddates.xlsx");
    let log_path = dir.path().join("project_update.log");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "UUID").unwrap();
    sheet.write_string(1, 0, "uuid-dated").unwrap();
    sheet.write_string(2, 0, "uuid-open").unwrap();
    sheet.write_string(3, 0, "uuid-missing").unwrap();
    workbook.save(&input).unwrap();

    let mut api = FakeProjects::default();
    api.insert("uuid-dated", Some("20180101"), Some("20210101"));
    api.insert("uuid-open", Some("20200101"), None);

    let ids = read_identifiers(&input).unwrap();
    assert_eq!(ids, vec!["uuid-dated", "uuid-open", "uuid-missing"]);

    let mut audit = AuditLog::open(&log_path).unwrap();
    let mut operator = Answers(VecDeque::from(["yes"]));

    let summary = execute(&mut operator, &ids, &api, &mut audit, "jdoe")
        .await
        .unwrap()
        .unwrap();
    drop(audit);

    assert_eq!(summary.modified, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped_has_end_date, 1);
    assert_eq!(summary.fetch_failed, 1);

    assert_eq!(
        api.writes.borrow().as_slice(),
        &[(
            "uuid-open".to_string(),
            "20200101".to_string(),
            "20230101".to_string()
        )]
    );
    assert_eq!(
        api.notes.borrow().as_slice(),
        &[(
            "uuid-open".to_string(),
            NOTE_TEXT.to_string(),
            "jdoe".to_string()
        )]
    );

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("INFO - End date already exists for UUID: uuid-dated, skipping update."));
    assert!(log.contains("WARNING - Failed to fetch data for UUID: uuid-missing - Status Code: 404"));
    assert!(log.contains("WARNING - Total projects modified: 1"));
}

#[tokio::test]
async fn declined_run_leaves_log_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("project_update.log");
    std::fs::write(&log_path, "previous run\n").unwrap();

    let mut api = FakeProjects::default();
    api.insert("uuid-open", Some("20200101"), None);
    let ids = vec!["uuid-open".to_string()];

    let mut audit = AuditLog::open(&log_path).unwrap();
    let mut operator = Answers(VecDeque::from(["no"]));

    let outcome = execute(&mut operator, &ids, &api, &mut audit, "jdoe")
        .await
        .unwrap();
    drop(audit);

    assert!(outcome.is_none());
    assert!(api.writes.borrow().is_empty());
    assert!(api.notes.borrow().is_empty());
    assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "previous run\n");
}
