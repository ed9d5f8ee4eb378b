use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::core::read_run::BaseReadRun;
use crate::parsing::ParseError;
use crate::utils::validation::{check_limit, MAX_READ_RUNS};

/// Parse a JSON file holding an array of read-run rows
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_read_runs`].
pub fn parse_read_runs_file(path: &Path) -> Result<Vec<BaseReadRun>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_read_runs(&content)
}

/// Parse the archive's JSON response text into read-run rows
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, `ParseError::InvalidFormat`
/// if the top-level value is not an array, or `ParseError::TooManyRuns` if
/// the response exceeds the row limit.
pub fn parse_read_runs(text: &str) -> Result<Vec<BaseReadRun>, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    read_runs_from_value(&value)
}

/// Decode rows from an already-parsed JSON value.
///
/// Rows that are not objects are skipped; fields inside a row are decoded
/// leniently (see [`BaseReadRun`]).
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if `value` is not an array, or
/// `ParseError::TooManyRuns` if it holds too many rows.
pub fn read_runs_from_value(value: &Value) -> Result<Vec<BaseReadRun>, ParseError> {
    let Some(rows) = value.as_array() else {
        return Err(ParseError::InvalidFormat(
            "expected a JSON array of read runs".to_string(),
        ));
    };

    let mut runs = Vec::with_capacity(rows.len().min(MAX_READ_RUNS));
    for (i, row) in rows.iter().enumerate() {
        if !row.is_object() {
            tracing::debug!(row = i, "Skipping read-run row that is not an object");
            continue;
        }

        if check_limit(runs.len(), MAX_READ_RUNS, "read runs").is_some() {
            return Err(ParseError::TooManyRuns(runs.len()));
        }

        runs.push(BaseReadRun::deserialize(row)?);
    }

    Ok(runs)
}
