//! Presumed end date calculation.
//!
//! The end date is derived purely at the string level: the leading four
//! characters are read as a year, shifted by [`PRESUMED_DURATION_YEARS`], and
//! the remainder of the start date is copied verbatim. No calendar, timezone
//! or leap-year handling takes place, so `2020-02-29` becomes `2023-02-29`.

use thiserror::Error;

/// Number of years a project is presumed to have run.
pub const PRESUMED_DURATION_YEARS: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndDateError {
    #[error("start date '{0}' does not begin with a four digit year")]
    InvalidYear(String),

    #[error("start date '{0}' would produce an end year beyond 9999")]
    YearOverflow(String),
}

/// Computes the presumed end date for `start_date`.
///
/// The output always has the same length and suffix as the input.
pub fn compute_end_date(start_date: &str) -> Result<String, EndDateError> {
    let (year, rest) = match (start_date.get(..4), start_date.get(4..)) {
        (Some(year), Some(rest)) if year.bytes().all(|b| b.is_ascii_digit()) => (year, rest),
        _ => return Err(EndDateError::InvalidYear(start_date.to_string())),
    };

    let year: u32 = year
        .parse()
        .map_err(|_| EndDateError::InvalidYear(start_date.to_string()))?;
    let end_year = year + PRESUMED_DURATION_YEARS;
    if end_year > 9999 {
        return Err(EndDateError::YearOverflow(start_date.to_string()));
    }

    Ok(format!("{:04}{}", end_year, rest))
}
