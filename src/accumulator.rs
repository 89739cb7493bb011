use crate::results::{PageRecord, Report};
use std::collections::HashMap;

/// Collects per-page records for a fixed plan and consolidates them in plan order
#[derive(Debug)]
pub struct Accumulator {
    planned: Vec<String>,
    records: HashMap<String, PageRecord>,
}

impl Accumulator {
    /// Creates an accumulator for the given planned keys, in plan order
    pub fn new(planned: Vec<String>) -> Self {
        Self {
            records: HashMap::with_capacity(planned.len()),
            planned,
        }
    }

    pub fn planned(&self) -> &[String] {
        &self.planned
    }

    /// Number of planned keys that have a record
    pub fn recorded(&self) -> usize {
        self.records.len()
    }

    /// Stores `record` under its page key, replacing any earlier record for
    /// that key. Returns false, dropping the record, when the key was not planned.
    pub fn record(&mut self, record: PageRecord) -> bool {
        if !self.planned.contains(&record.page_key) {
            ::log::warn!(
                "Ignoring record for unplanned page {}; it will not appear in the report",
                record.page_key
            );
            return false;
        }
        if let Some(previous) = self.records.insert(record.page_key.clone(), record) {
            ::log::debug!("Replaced earlier record for {}", previous.page_key);
        }
        true
    }

    /// Builds the report in plan order, filling unrecorded keys with missing records
    pub fn finalize(mut self) -> Report {
        let records = self
            .planned
            .iter()
            .map(|key| {
                self.records.remove(key).unwrap_or_else(|| {
                    ::log::warn!("No record for planned page {}; marking it missing", key);
                    PageRecord::missing(key.clone())
                })
            })
            .collect();
        Report::new(records)
    }
}
