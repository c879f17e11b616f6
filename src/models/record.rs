//! NOTAM record data structure.

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::text::unescape_html;

/// A single notice as delivered by the upstream source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Upstream notice identifier (empty if the source omitted it)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,

    /// Raw notice text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    /// Full ICAO-formatted notice text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_icao: String,

    /// Effective start timestamp
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start: String,

    /// Effective end timestamp
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end: String,
}

impl Record {
    /// Uppercased search surface: raw text followed by the ICAO text.
    pub fn blob(&self) -> String {
        format!("{} {}", self.text, self.full_icao).to_uppercase()
    }

    /// Whether two records describe the same notice.
    ///
    /// Compares ids when both carry one, otherwise falls back to comparing
    /// every field.
    pub fn same_notice(&self, other: &Record) -> bool {
        if self.id.is_empty() || other.id.is_empty() {
            self == other
        } else {
            self.id == other.id
        }
    }

    /// Text to show for this notice: ICAO format when present, else raw text.
    pub fn display_text(&self) -> String {
        let content = if self.full_icao.trim().is_empty() {
            &self.text
        } else {
            &self.full_icao
        };
        unescape_html(content)
    }

    /// Effective window rendered as `start -> end`.
    pub fn window(&self) -> String {
        format!("{} -> {}", short_time(&self.start), short_time(&self.end))
    }

    /// Format the record for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{start}`, `{end}`, `{window}`
    /// - `{text}`, `{full_icao}`, `{display}`
    pub fn format(&self, template: &str) -> String {
        let id = if self.id.is_empty() { "N/A" } else { &self.id };
        template
            .replace("{id}", id)
            .replace("{start}", &short_time(&self.start))
            .replace("{end}", &short_time(&self.end))
            .replace("{window}", &self.window())
            .replace("{text}", &self.text)
            .replace("{full_icao}", &self.full_icao)
            .replace("{display}", &self.display_text())
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM`, or its first 16 characters
/// when it isn't RFC 3339 (e.g. `PERM`).
fn short_time(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value.chars().take(16).collect(),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
