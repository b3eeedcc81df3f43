//! Reads project identifiers from the `UUID` column of a spreadsheet.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

pub const UUID_COLUMN: &str = "UUID";

#[derive(Debug, Error)]
pub enum SourceReadError {
    #[error("input file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported input format for {}: expected .xlsx, .xlsm, .xls, .ods or .csv", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("failed to read csv {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{} contains no worksheet", .0.display())]
    NoSheet(PathBuf),

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Returns the non-empty `UUID` cells of `path` in row order.
///
/// Duplicates are kept. The format is chosen from the file extension.
pub fn read_identifiers(path: &Path) -> Result<Vec<String>, SourceReadError> {
    if !path.exists() {
        return Err(SourceReadError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx" | "xlsm" | "xls" | "ods") => read_workbook(path),
        Some("csv") => read_csv(path),
        _ => Err(SourceReadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_workbook(path: &Path) -> Result<Vec<String>, SourceReadError> {
    let spreadsheet_error = |source| SourceReadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceReadError::NoSheet(path.to_path_buf()))?
        .map_err(spreadsheet_error)?;

    let mut rows = range.rows();
    let column = rows
        .next()
        .and_then(|header| header.iter().position(|cell| is_uuid_header(&cell_text(cell))))
        .ok_or_else(|| missing_column(path))?;

    Ok(rows
        .filter_map(|row| row.get(column))
        .map(cell_text)
        .filter(|value| !value.is_empty())
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<String>, SourceReadError> {
    let csv_error = |source| SourceReadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let column = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(is_uuid_header)
        .ok_or_else(|| missing_column(path))?;

    let mut identifiers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if let Some(value) = record.get(column).map(str::trim) {
            if !value.is_empty() {
                identifiers.push(value.to_string());
            }
        }
    }
    Ok(identifiers)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn is_uuid_header(name: &str) -> bool {
    name.trim() == UUID_COLUMN
}

fn missing_column(path: &Path) -> SourceReadError {
    SourceReadError::MissingColumn {
        path: path.to_path_buf(),
        column: UUID_COLUMN,
    }
}
