// src/pipeline/batch.rs

//! Batch search pipeline.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{BatchReport, FetchConfig, FetchProgress, QueryRow};
use crate::services::{BatchRunner, LocationCache, NotamSource};

/// Run a batch of query rows.
///
/// Fetches every distinct valid location once into a fresh cache, then
/// matches each row against it. The cache lives only for this call.
pub async fn run_batch<F>(
    source: &dyn NotamSource,
    rows: Vec<QueryRow>,
    config: &FetchConfig,
    on_progress: F,
) -> Result<BatchReport>
where
    F: FnMut(&FetchProgress),
{
    if rows.is_empty() {
        return Err(AppError::empty_input("the batch has no rows"));
    }

    let started_at = Utc::now();
    let plan = BatchRunner::plan(&rows);

    for skipped in &plan.skipped {
        log::warn!(
            "Skipping row {} ('{}'): {}",
            skipped.index + 1,
            skipped.location,
            skipped.reason
        );
    }

    let locations = plan.locations();
    if locations.is_empty() {
        return Err(AppError::empty_input(
            "no rows with a valid 4-character location",
        ));
    }

    log::info!(
        "Fetching {} location(s) for {} row(s) from {}",
        locations.len(),
        plan.eligible.len(),
        source.name()
    );

    let cache = LocationCache::fetch_all(source, &locations, config, on_progress).await;
    let results = BatchRunner::run(&rows, &cache);

    for (index, outcome) in &results {
        if let Err(error) = outcome {
            log::warn!("Row {} failed: {}", index + 1, error);
        }
    }

    let report = BatchReport {
        failed_locations: cache.failed_locations().cloned().collect(),
        skipped: plan.skipped,
        results,
        rows,
        started_at,
        finished_at: Utc::now(),
    };

    log::info!(
        "Batch complete: {} of {} row(s) with matches, {} failed location(s), {} ms",
        report.rows_with_matches(),
        report.results.len(),
        report.failed_locations.len(),
        report.elapsed_ms()
    );

    Ok(report)
}
