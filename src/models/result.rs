//! Search outcome structures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Location, QueryRow, Record};

/// Ordered, de-duplicated notices matching one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub matches: Vec<Record>,
}

impl MatchResult {
    /// Build a result from candidate records, keeping the first occurrence
    /// of each notice.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut result = Self::default();
        result.extend(records);
        result
    }

    /// Append records that aren't already present, preserving first-seen order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            if !self.matches.iter().any(|seen| seen.same_notice(&record)) {
                self.matches.push(record);
            }
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Incremental fetch progress, emitted once per completed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchProgress {
    pub completed: usize,
    pub total: usize,
    pub location: Location,
}

impl FetchProgress {
    /// Fraction of locations fetched so far, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// A batch row excluded from execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub index: usize,
    pub location: String,
    pub reason: String,
}

/// Everything produced by one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// All input rows, including skipped ones, in input order
    pub rows: Vec<QueryRow>,

    /// Rows excluded because their location was invalid
    pub skipped: Vec<SkippedRow>,

    /// Outcome per executed row index
    pub results: BTreeMap<usize, Result<MatchResult>>,

    /// Locations whose fetch failed and were treated as empty
    pub failed_locations: Vec<Location>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Number of executed rows with at least one match.
    pub fn rows_with_matches(&self) -> usize {
        self.results
            .values()
            .filter(|outcome| matches!(outcome, Ok(result) if !result.is_empty()))
            .count()
    }

    /// Number of executed rows that failed (e.g. invalid pattern).
    pub fn failed_rows(&self) -> usize {
        self.results.values().filter(|outcome| outcome.is_err()).count()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
