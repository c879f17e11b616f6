// src/pipeline/single.rs

//! Single-location search pipeline.

use crate::error::Result;
use crate::models::{Location, MatchResult, SingleQuery};
use crate::services::NotamSource;

/// Run an ad-hoc query against one freshly fetched location.
///
/// Unlike a batch, a fetch failure here is returned to the caller.
pub async fn run_single(source: &dyn NotamSource, query: &SingleQuery) -> Result<MatchResult> {
    let location = Location::parse(&query.location)?;
    log::info!("Searching {} ({:?}) via {}", location, query.mode, source.name());

    let records = source
        .search(&location, query.mode, &query.term, query.regex)
        .await?;
    Ok(MatchResult::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::source::mock::{MockSource, record};

    fn source() -> MockSource {
        MockSource::default().with(
            "KJFK",
            vec![
                record("1", "RWY 04R/22L CLSD"),
                record("2", "OBST CRANE 200FT"),
                record("3", "TWY 04R HOLD LINE"),
            ],
        )
    }

    #[tokio::test]
    async fn test_all_returns_every_record() {
        let result = run_single(&source(), &SingleQuery::all("kjfk")).await.unwrap();
        assert_eq!(result.count(), 3);
    }

    #[tokio::test]
    async fn test_runway_mode() {
        let result = run_single(&source(), &SingleQuery::runway("KJFK", "04r"))
            .await
            .unwrap();
        assert_eq!(result.count(), 1);
        assert_eq!(result.matches[0].id, "1");
    }

    #[tokio::test]
    async fn test_keyword_regex_mode() {
        let result = run_single(&source(), &SingleQuery::keyword("KJFK", r"crane \d+", true))
            .await
            .unwrap();
        assert_eq!(result.count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_location_is_error() {
        let result = run_single(&source(), &SingleQuery::all("JFK")).await;
        assert!(matches!(result, Err(AppError::InvalidLocation { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_error() {
        let source = MockSource::default().failing("KJFK", "503");
        let result = run_single(&source, &SingleQuery::all("KJFK")).await;
        assert!(matches!(result, Err(AppError::Fetch { .. })));
    }
}
