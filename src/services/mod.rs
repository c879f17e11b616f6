//! Service layer for the search application.
//!
//! This module contains the business logic for:
//! - Upstream notice retrieval (`NotamSource`, `FaaSource`, `DirectorySource`)
//! - Per-run fetch caching (`LocationCache`)
//! - Notice matching (`Matcher`)
//! - Batch row evaluation (`BatchRunner`)

mod batch;
mod cache;
pub mod matcher;
pub mod source;

pub use batch::{BatchPlan, BatchRunner};
pub use cache::LocationCache;
pub use matcher::{Matcher, match_alternatives, matches};
pub use source::{DirectorySource, FaaSource, NotamSource, build_source};
