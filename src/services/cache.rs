// src/services/cache.rs

//! Run-scoped location cache.
//!
//! Each distinct location is fetched once per batch run. A failed fetch is
//! recorded as an empty notice set so the rest of the run carries on.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::models::{FetchConfig, FetchProgress, Location, Record};
use crate::services::NotamSource;

/// Notices per location for the lifetime of one run. Read-only once built.
#[derive(Debug, Default)]
pub struct LocationCache {
    records: BTreeMap<Location, Vec<Record>>,
    failed: BTreeSet<Location>,
}

impl LocationCache {
    /// Fetch every location once, bounded by `max_concurrent`.
    ///
    /// `on_progress` is called after each location completes, in completion
    /// order. The resulting map is keyed by location, so its contents don't
    /// depend on that order.
    pub async fn fetch_all<F>(
        source: &dyn NotamSource,
        locations: &BTreeSet<Location>,
        config: &FetchConfig,
        mut on_progress: F,
    ) -> Self
    where
        F: FnMut(&FetchProgress),
    {
        let delay = Duration::from_millis(config.request_delay_ms);
        let concurrency = config.max_concurrent.max(1);
        let total = locations.len();

        let mut cache = Self::default();
        let mut completed = 0;

        let mut fetches = stream::iter(locations.iter().cloned())
            .map(|location| async move {
                let result = source.fetch_all(&location).await;
                (location, result)
            })
            .buffer_unordered(concurrency);

        while let Some((location, result)) = fetches.next().await {
            completed += 1;
            match result {
                Ok(records) => {
                    log::debug!("Fetched {} notices for {}", records.len(), location);
                    cache.records.insert(location.clone(), records);
                }
                Err(error) => {
                    log::warn!("Failed to fetch notices for {}: {}", location, error);
                    cache.records.insert(location.clone(), Vec::new());
                    cache.failed.insert(location.clone());
                }
            }

            on_progress(&FetchProgress {
                completed,
                total,
                location,
            });

            if delay.as_millis() > 0 && completed < total {
                tokio::time::sleep(delay).await;
            }
        }

        cache
    }

    /// Build a cache from already-fetched notices.
    pub fn from_records(records: BTreeMap<Location, Vec<Record>>) -> Self {
        Self {
            records,
            failed: BTreeSet::new(),
        }
    }

    /// Notices for a location; empty if it was never fetched or failed.
    pub fn get(&self, location: &Location) -> &[Record] {
        self.records
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.records.contains_key(location)
    }

    /// Whether the fetch for this location failed.
    pub fn is_failed(&self, location: &Location) -> bool {
        self.failed.contains(location)
    }

    pub fn failed_locations(&self) -> impl Iterator<Item = &Location> {
        self.failed.iter()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
