//! Validation and persistence of the final report.

use crate::error::{EmitError, ValidationError};
use crate::plan::{PAGE_KEY_FORMAT, page_key};
use crate::results::{PageStatus, Report};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Parses `payload` as a report and checks the invariants serde cannot express.
///
/// `max_items` bounds the number of items per page. The payload is kept
/// verbatim in the error on failure.
pub fn validate(payload: &str, max_items: usize) -> Result<Report, ValidationError> {
    let report: Report =
        serde_json::from_str(payload).map_err(|e| ValidationError::new(e.to_string(), payload))?;

    let mut seen = HashSet::new();
    for (index, record) in report.records.iter().enumerate() {
        if record.page_key.trim().is_empty() {
            return Err(ValidationError::new(
                format!("leaderboard {} has an empty date", index),
                payload,
            ));
        }
        let canonical = NaiveDate::parse_from_str(&record.page_key, PAGE_KEY_FORMAT)
            .ok()
            .map(page_key);
        if canonical.as_deref() != Some(record.page_key.as_str()) {
            return Err(ValidationError::new(
                format!("date {:?} is not a YYYY-MM-DD calendar date", record.page_key),
                payload,
            ));
        }
        if !seen.insert(record.page_key.as_str()) {
            return Err(ValidationError::new(
                format!("date {} appears more than once", record.page_key),
                payload,
            ));
        }
        if record.items.len() > max_items {
            return Err(ValidationError::new(
                format!(
                    "date {} has {} products, more than the limit of {}",
                    record.page_key,
                    record.items.len(),
                    max_items
                ),
                payload,
            ));
        }
        if record.status == PageStatus::Extracted && record.items.is_empty() {
            return Err(ValidationError::new(
                format!("date {} is marked extracted but has no products", record.page_key),
                payload,
            ));
        }
        if !record.status.holds_items() && !record.items.is_empty() {
            return Err(ValidationError::new(
                format!(
                    "date {} is marked {:?} but has {} products",
                    record.page_key,
                    record.status,
                    record.items.len()
                ),
                payload,
            ));
        }
        if let Some(position) = record.items.iter().position(|i| i.name.trim().is_empty()) {
            return Err(ValidationError::new(
                format!("date {} product {} has an empty name", record.page_key, position),
                payload,
            ));
        }
    }

    Ok(report)
}

/// Canonical serialization: struct field order, two-space indentation
pub fn to_canonical_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Destination for the validated report
#[derive(Debug, Clone)]
pub struct ReportSink {
    path: PathBuf,
}

impl ReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the canonical form of `report`, replacing any existing file
    pub fn write(&self, report: &Report) -> Result<(), EmitError> {
        let mut json = to_canonical_json(report)?;
        json.push('\n');
        fs::write(&self.path, json).map_err(|source| EmitError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Validates `payload` and, if it conforms, writes it to `sink`
pub fn validate_and_emit(
    payload: &str,
    max_items: usize,
    sink: &ReportSink,
) -> Result<Report, EmitError> {
    let report = validate(payload, max_items)?;
    sink.write(&report)?;
    ::log::info!(
        "Report with {} leaderboards saved to {}",
        report.records.len(),
        sink.path().display()
    );
    Ok(report)
}
