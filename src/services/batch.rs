// src/services/batch.rs

//! Batch row evaluation over a populated location cache.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::models::{Location, MatchResult, QueryRow, SearchType, SkippedRow};
use crate::services::LocationCache;
use crate::services::matcher::match_alternatives;

/// Rows split into executable rows and skipped rows.
#[derive(Debug, Default)]
pub struct BatchPlan {
    /// Row index and validated location for each executable row
    pub eligible: Vec<(usize, Location)>,
    pub skipped: Vec<SkippedRow>,
}

impl BatchPlan {
    /// Distinct locations referenced by executable rows.
    pub fn locations(&self) -> BTreeSet<Location> {
        self.eligible.iter().map(|(_, loc)| loc.clone()).collect()
    }
}

/// Evaluates batch rows against cached notices.
#[derive(Debug, Default)]
pub struct BatchRunner;

impl BatchRunner {
    /// Validate row locations. Invalid rows are skipped, not fatal.
    pub fn plan(rows: &[QueryRow]) -> BatchPlan {
        let mut plan = BatchPlan::default();

        for (index, row) in rows.iter().enumerate() {
            match row.location() {
                Ok(location) => plan.eligible.push((index, location)),
                Err(error) => plan.skipped.push(SkippedRow {
                    index,
                    location: row.location.clone(),
                    reason: error.to_string(),
                }),
            }
        }

        plan
    }

    /// Match every executable row against the cache.
    ///
    /// Rows are independent: an invalid pattern fails only its own row.
    pub fn run(rows: &[QueryRow], cache: &LocationCache) -> BTreeMap<usize, Result<MatchResult>> {
        Self::plan(rows)
            .eligible
            .into_iter()
            .map(|(index, location)| {
                let row = &rows[index];
                (index, Self::run_row(row, &location, cache))
            })
            .collect()
    }

    fn run_row(row: &QueryRow, location: &Location, cache: &LocationCache) -> Result<MatchResult> {
        let is_regex = row.regex && row.search_type == SearchType::Keyword;
        match_alternatives(
            cache.get(location),
            row.search_type,
            &row.alternatives(),
            is_regex,
        )
    }
}
