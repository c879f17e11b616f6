// src/services/matcher.rs

//! Notice matching engine.
//!
//! Decides which notices satisfy a runway or keyword query. Runway terms
//! only match notices that mention a runway at all, and only as a
//! standalone designator: `07R` matches `RWY 07R/25L` but not `1407R`.

use regex::{Regex, RegexBuilder};

use crate::error::{AppError, Result};
use crate::models::{Alternatives, MatchResult, Record, SearchType};

/// Tokens that mark a notice as runway-related.
const RUNWAY_MARKERS: [&str; 2] = ["RWY", "RUNWAY"];

/// A compiled query term.
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: MatchKind,
}

#[derive(Debug, Clone)]
enum MatchKind {
    /// Blank keyword: every notice matches
    Everything,
    /// Runway designator bounded by non-digits; `None` for a blank designator
    Runway(Option<Regex>),
    /// Uppercased literal substring
    Contains(String),
    /// User-supplied case-insensitive pattern
    Pattern(Regex),
}

impl Matcher {
    /// Compile a term for the given search type.
    ///
    /// `is_regex` only applies to keyword searches. An invalid pattern is
    /// reported as [`AppError::InvalidPattern`].
    pub fn compile(search_type: SearchType, term: &str, is_regex: bool) -> Result<Self> {
        let term = term.trim();

        let kind = match search_type {
            SearchType::Runway if term.is_empty() => MatchKind::Runway(None),
            SearchType::Runway => {
                let designator = regex::escape(&term.to_uppercase());
                let pattern = format!(r"(?:^|[^\d]){designator}(?:[^0-9]|$)");
                let regex = Regex::new(&pattern)
                    .map_err(|e| AppError::invalid_pattern(term, e))?;
                MatchKind::Runway(Some(regex))
            }
            SearchType::Keyword if term.is_empty() => MatchKind::Everything,
            SearchType::Keyword if is_regex => {
                let regex = RegexBuilder::new(term)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| AppError::invalid_pattern(term, e))?;
                MatchKind::Pattern(regex)
            }
            SearchType::Keyword => MatchKind::Contains(term.to_uppercase()),
        };

        Ok(Self { kind })
    }

    /// Whether a single record satisfies this term.
    pub fn is_match(&self, record: &Record) -> bool {
        match &self.kind {
            MatchKind::Everything => true,
            MatchKind::Runway(designator) => {
                let blob = record.blob();
                let mentions_runway = RUNWAY_MARKERS.iter().any(|marker| blob.contains(marker));
                mentions_runway && designator.as_ref().is_none_or(|re| re.is_match(&blob))
            }
            MatchKind::Contains(needle) => record.blob().contains(needle.as_str()),
            MatchKind::Pattern(regex) => regex.is_match(&record.blob()),
        }
    }

    /// Order-preserving subset of `records` that match.
    pub fn filter(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| self.is_match(record))
            .cloned()
            .collect()
    }
}

/// Match `records` against a single term.
pub fn matches(
    records: &[Record],
    search_type: SearchType,
    term: &str,
    is_regex: bool,
) -> Result<Vec<Record>> {
    Ok(Matcher::compile(search_type, term, is_regex)?.filter(records))
}

/// Match `records` against every alternative and union the results.
///
/// All alternatives are compiled before any matching happens, so an invalid
/// pattern fails the whole query without partial output. A notice matching
/// several alternatives appears once, at its first-seen position.
pub fn match_alternatives(
    records: &[Record],
    search_type: SearchType,
    alternatives: &Alternatives,
    is_regex: bool,
) -> Result<MatchResult> {
    let matchers = alternatives
        .iter()
        .map(|term| Matcher::compile(search_type, term, is_regex))
        .collect::<Result<Vec<_>>>()?;

    let mut result = MatchResult::default();
    for matcher in &matchers {
        result.extend(matcher.filter(records));
    }
    Ok(result)
}
