// src/models/mod.rs

//! Domain models for the NOTAM search application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod query;
mod record;
mod result;

// Re-export all public types
pub use config::{Config, FetchConfig, LoggingConfig, SourceConfig, SourceKind};
pub use query::{Alternatives, Location, QueryMode, QueryRow, SearchType, SingleQuery};
pub use record::Record;
pub use result::{BatchReport, FetchProgress, MatchResult, SkippedRow};
