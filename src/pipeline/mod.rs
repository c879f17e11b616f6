//! Pipeline entry points for search operations.
//!
//! - `run_batch`: Fetch each distinct location once and evaluate query rows
//! - `run_single`: Ad-hoc query against one location
//! - `run_runway_check`: Per-runway sweep of one location

pub mod batch;
pub mod runways;
pub mod single;

pub use batch::run_batch;
pub use runways::{RunwayCheck, run_runway_check};
pub use single::run_single;
