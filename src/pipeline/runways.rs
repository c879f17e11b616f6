// src/pipeline/runways.rs

//! Runway verification sweep: one location, many runway designators.

use crate::error::Result;
use crate::models::{Location, MatchResult, SearchType};
use crate::services::{Matcher, NotamSource};

/// Notices found for one runway designator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunwayCheck {
    pub runway: String,
    pub result: MatchResult,
}

/// Fetch a location once and match each runway designator against it.
pub async fn run_runway_check(
    source: &dyn NotamSource,
    location: &str,
    runways: &[String],
) -> Result<Vec<RunwayCheck>> {
    let location = Location::parse(location)?;
    let matchers = runways
        .iter()
        .map(|rwy| Matcher::compile(SearchType::Runway, rwy, false))
        .collect::<Result<Vec<_>>>()?;

    log::info!("Checking {} runway(s) at {}", runways.len(), location);
    let records = source.fetch_all(&location).await?;

    Ok(runways
        .iter()
        .zip(&matchers)
        .map(|(runway, matcher)| RunwayCheck {
            runway: runway.trim().to_uppercase(),
            result: MatchResult::from_records(matcher.filter(&records)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::source::mock::{MockSource, record};

    #[tokio::test]
    async fn test_sweep_fetches_once_and_splits_by_runway() {
        let source = MockSource::default().with(
            "VHHH",
            vec![
                record("1", "RWY 07R/25L CLSD"),
                record("2", "RWY 07C ILS U/S"),
                record("3", "RWY 25R APRON STAND 107R CLSD"),
            ],
        );
        let runways: Vec<String> = ["07R", "07L", "07C", "25L", "25R"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let checks = run_runway_check(&source, "VHHH", &runways).await.unwrap();

        assert_eq!(source.calls("VHHH"), 1);
        let counts: Vec<_> = checks.iter().map(|c| (c.runway.as_str(), c.result.count())).collect();
        assert_eq!(
            counts,
            vec![("07R", 1), ("07L", 0), ("07C", 1), ("25L", 1), ("25R", 1)]
        );
        assert_eq!(checks[0].result.matches[0].id, "1");
    }
}
