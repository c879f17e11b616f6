//! Query data structures: locations, search types, and batch rows.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, Result};

/// A validated 4-character ICAO airport or FIR code, uppercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location(String);

impl Location {
    /// Parse and normalize a location code.
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_uppercase();
        if code.chars().count() != 4 {
            return Err(AppError::invalid_location(raw));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Location {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// How a term is matched against a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Runway,
    Keyword,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Runway => "Runway",
            SearchType::Keyword => "Keyword",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "runway" => Ok(SearchType::Runway),
            "keyword" => Ok(SearchType::Keyword),
            other => Err(AppError::validation(format!(
                "unknown search type '{other}' (expected Runway or Keyword)"
            ))),
        }
    }
}

impl Serialize for SearchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SearchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Alternative terms parsed from a pipe-delimited keyword expression.
///
/// Never empty: a blank expression yields the single match-all term `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternatives(Vec<String>);

impl Alternatives {
    /// Split on `|`, trim and uppercase each term, dropping blanks.
    pub fn parse(expr: &str) -> Self {
        Self::collect(expr, |term| term.to_uppercase())
    }

    /// Split on `|` and trim each term, preserving case.
    ///
    /// Used for regex rows where uppercasing would change escapes such as `\d`.
    pub fn parse_patterns(expr: &str) -> Self {
        Self::collect(expr, str::to_string)
    }

    fn collect(expr: &str, normalize: impl Fn(&str) -> String) -> Self {
        let terms: Vec<String> = expr
            .split('|')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(normalize)
            .collect();

        if terms.is_empty() {
            Self(vec![String::new()])
        } else {
            Self(terms)
        }
    }

    /// True when the expression carried no terms.
    pub fn is_match_all(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A single row of a batch search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRow {
    /// Airport or FIR code as entered (validated at run time)
    #[serde(rename = "FIR/AIRPORT", alias = "location")]
    pub location: String,

    #[serde(rename = "Type", alias = "type")]
    pub search_type: SearchType,

    /// Pipe-delimited alternative terms; blank means match-all for keyword rows
    #[serde(rename = "Keyword", alias = "keyword", default)]
    pub keyword_expr: String,

    /// Treat each alternative as a regular expression.
    ///
    /// The expression is still split on `|` first, so a grouped alternation
    /// like `RWY (07R|25L)` becomes two invalid patterns. Write it as
    /// `RWY 07R|RWY 25L` instead.
    #[serde(rename = "Regex", alias = "regex", default)]
    pub regex: bool,
}

/// On-disk batch definition: a list of `[[rows]]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BatchFile {
    #[serde(default)]
    rows: Vec<QueryRow>,
}

impl QueryRow {
    /// Load batch rows from a TOML file.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let content = fs::read_to_string(path)?;
        let file: BatchFile = toml::from_str(&content)?;
        Ok(file.rows)
    }

    pub fn new(location: &str, search_type: SearchType, keyword_expr: &str) -> Self {
        Self {
            location: location.to_string(),
            search_type,
            keyword_expr: keyword_expr.to_string(),
            regex: false,
        }
    }

    /// Validated location for this row.
    pub fn location(&self) -> Result<Location> {
        Location::parse(&self.location)
    }

    /// Alternative terms for this row.
    pub fn alternatives(&self) -> Alternatives {
        if self.regex && self.search_type == SearchType::Keyword {
            Alternatives::parse_patterns(&self.keyword_expr)
        } else {
            Alternatives::parse(&self.keyword_expr)
        }
    }

    /// Human-readable label, e.g. `Row 1: VHHH - Runway (07R)`.
    pub fn label(&self, index: usize) -> String {
        let expr = self.keyword_expr.trim();
        let detail = if expr.is_empty() {
            "(All)".to_string()
        } else {
            format!("({expr})")
        };
        format!(
            "Row {}: {} - {} {}",
            index + 1,
            self.location.trim().to_uppercase(),
            self.search_type,
            detail
        )
    }
}

/// Selector for an ad-hoc single-location search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    All,
    Runway,
    Keyword,
}

/// An ad-hoc query against one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleQuery {
    pub location: String,
    pub mode: QueryMode,
    pub term: String,
    pub regex: bool,
}

impl SingleQuery {
    pub fn all(location: &str) -> Self {
        Self {
            location: location.to_string(),
            mode: QueryMode::All,
            term: String::new(),
            regex: false,
        }
    }

    pub fn runway(location: &str, runway: &str) -> Self {
        Self {
            location: location.to_string(),
            mode: QueryMode::Runway,
            term: runway.to_string(),
            regex: false,
        }
    }

    pub fn keyword(location: &str, term: &str, regex: bool) -> Self {
        Self {
            location: location.to_string(),
            mode: QueryMode::Keyword,
            term: term.to_string(),
            regex,
        }
    }

    /// Search type and term this query resolves to. `All` is a blank keyword.
    pub fn resolve(&self) -> (SearchType, &str, bool) {
        match self.mode {
            QueryMode::All => (SearchType::Keyword, "", false),
            QueryMode::Runway => (SearchType::Runway, self.term.as_str(), false),
            QueryMode::Keyword => (SearchType::Keyword, self.term.as_str(), self.regex),
        }
    }
}
