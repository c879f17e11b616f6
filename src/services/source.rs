// src/services/source.rs

//! Upstream NOTAM sources.
//!
//! A source returns every notice for one location. Filtering happens
//! locally in the matcher, so one fetch can serve any number of queries.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Config, Location, QueryMode, Record, SingleQuery, SourceConfig, SourceKind};
use crate::services::Matcher;
use crate::utils::http::create_async_client;

/// Trait for NOTAM providers.
#[async_trait]
pub trait NotamSource: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Fetch all current notices for a location.
    async fn fetch_all(&self, location: &Location) -> Result<Vec<Record>>;

    /// Fetch a location and keep only the notices matching the query.
    ///
    /// The term is compiled before fetching, so an invalid pattern costs
    /// no request.
    async fn search(
        &self,
        location: &Location,
        mode: QueryMode,
        term: &str,
        is_regex: bool,
    ) -> Result<Vec<Record>> {
        let query = SingleQuery {
            location: location.to_string(),
            mode,
            term: term.to_string(),
            regex: is_regex,
        };
        let (search_type, term, is_regex) = query.resolve();
        let matcher = Matcher::compile(search_type, term, is_regex)?;
        let records = self.fetch_all(location).await?;
        Ok(matcher.filter(&records))
    }
}

/// Build the source selected in the configuration.
pub fn build_source(config: &Config) -> Result<Box<dyn NotamSource>> {
    match config.source.kind {
        SourceKind::Faa => {
            let client = create_async_client(&config.fetch)?;
            Ok(Box::new(FaaSource::new(client, &config.source)))
        }
        SourceKind::Directory => Ok(Box::new(DirectorySource::new(&config.source.data_dir))),
    }
}

// --- FAA NOTAM API ---

/// Source backed by the FAA NOTAM API.
pub struct FaaSource {
    client: Client,
    base_url: String,
    page_size: usize,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl FaaSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    async fn fetch_page(&self, location: &Location, page_num: usize) -> Result<FaaPage> {
        let mut request = self
            .client
            .get(format!("{}/notams", self.base_url))
            .query(&[
                ("icaoLocation", location.as_str().to_string()),
                ("pageSize", self.page_size.to_string()),
                ("pageNum", page_num.to_string()),
            ]);

        if let Some(id) = &self.client_id {
            request = request.header("client_id", id);
        }
        if let Some(secret) = &self.client_secret {
            request = request.header("client_secret", secret);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(location.as_str(), e))?;

        response
            .json::<FaaPage>()
            .await
            .map_err(|e| AppError::fetch(location.as_str(), e))
    }
}

#[async_trait]
impl NotamSource for FaaSource {
    fn name(&self) -> &str {
        "faa"
    }

    async fn fetch_all(&self, location: &Location) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut page_num = 1;

        loop {
            let page = self.fetch_page(location, page_num).await?;
            let total_pages = page.total_pages;
            records.extend(page.items.into_iter().map(FaaItem::into_record));

            if page_num >= total_pages {
                break;
            }
            page_num += 1;
        }

        log::debug!("{}: {} notices from {}", location, records.len(), self.name());
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaaPage {
    #[serde(default)]
    total_pages: usize,
    #[serde(default)]
    items: Vec<FaaItem>,
}

#[derive(Debug, Deserialize)]
struct FaaItem {
    properties: FaaProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaaProperties {
    #[serde(rename = "coreNOTAMData")]
    core_notam_data: FaaCoreData,
}

#[derive(Debug, Deserialize)]
struct FaaCoreData {
    notam: FaaNotam,
    #[serde(default, rename = "notamTranslation")]
    translations: Vec<FaaTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaaNotam {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    effective_start: Option<String>,
    #[serde(default)]
    effective_end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaaTranslation {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    formatted_text: Option<String>,
}

impl FaaItem {
    fn into_record(self) -> Record {
        let core = self.properties.core_notam_data;
        let full_icao = core
            .translations
            .into_iter()
            .find(|t| t.kind == "ICAO")
            .and_then(|t| t.formatted_text)
            .unwrap_or_default();

        Record {
            id: core.notam.id.unwrap_or_default(),
            text: core.notam.text.unwrap_or_default(),
            full_icao,
            start: core.notam.effective_start.unwrap_or_default(),
            end: core.notam.effective_end.unwrap_or_default(),
        }
    }
}

// --- JSON directory ---

/// Source reading `{data_dir}/{LOCATION}.json` files holding record arrays.
pub struct DirectorySource {
    data_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

#[async_trait]
impl NotamSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch_all(&self, location: &Location) -> Result<Vec<Record>> {
        let path = self.data_dir.join(format!("{}.json", location));
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::fetch(location.as_str(), format!("{}: {}", path.display(), e)))?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::fetch(location.as_str(), e))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// In-memory source that counts fetches per location.
    #[derive(Default)]
    pub(crate) struct MockSource {
        data: HashMap<String, std::result::Result<Vec<Record>, String>>,
        delays: HashMap<String, Duration>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl MockSource {
        pub(crate) fn with(mut self, location: &str, records: Vec<Record>) -> Self {
            self.data.insert(location.to_string(), Ok(records));
            self
        }

        pub(crate) fn failing(mut self, location: &str, message: &str) -> Self {
            self.data.insert(location.to_string(), Err(message.to_string()));
            self
        }

        pub(crate) fn slow(mut self, location: &str, millis: u64) -> Self {
            self.delays
                .insert(location.to_string(), Duration::from_millis(millis));
            self
        }

        pub(crate) fn calls(&self, location: &str) -> usize {
            let calls = self.calls.lock().unwrap();
            calls.get(location).copied().unwrap_or(0)
        }

        pub(crate) fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }
    }

    #[async_trait]
    impl NotamSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch_all(&self, location: &Location) -> Result<Vec<Record>> {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(location.to_string())
                .or_insert(0) += 1;

            if let Some(delay) = self.delays.get(location.as_str()) {
                tokio::time::sleep(*delay).await;
            }

            match self.data.get(location.as_str()) {
                Some(Ok(records)) => Ok(records.clone()),
                Some(Err(message)) => Err(AppError::fetch(location.as_str(), message)),
                None => Ok(Vec::new()),
            }
        }
    }

    pub(crate) fn record(id: &str, text: &str) -> Record {
        Record {
            id: id.to_string(),
            text: text.to_string(),
            ..Record::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::mock::{MockSource, record};
    use super::*;

    fn faa_item(id: &str, text: &str, icao: &str) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": {
                "coreNOTAMData": {
                    "notam": {
                        "id": id,
                        "number": "01/001",
                        "icaoLocation": "VHHH",
                        "effectiveStart": "2024-03-01T10:00:00.000Z",
                        "effectiveEnd": "PERM",
                        "text": text
                    },
                    "notamTranslation": [
                        { "type": "LOCAL_FORMAT", "simpleText": "ignored" },
                        { "type": "ICAO", "formattedText": icao }
                    ]
                }
            }
        })
    }

    fn faa_source(base_url: String) -> FaaSource {
        let config = SourceConfig {
            base_url,
            page_size: 2,
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            ..SourceConfig::default()
        };
        FaaSource::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_faa_source_walks_pages() {
        let server = MockServer::start_async().await;

        let page1 = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/notams")
                    .query_param("icaoLocation", "VHHH")
                    .query_param("pageNum", "1")
                    .header("client_id", "id")
                    .header("client_secret", "secret");
                then.status(200).json_body(json!({
                    "pageSize": 2,
                    "pageNum": 1,
                    "totalCount": 3,
                    "totalPages": 2,
                    "items": [
                        faa_item("N1", "RWY 07R/25L CLSD", "E) RWY 07R/25L CLSD"),
                        faa_item("N2", "TWY A CLSD", "E) TWY A CLSD")
                    ]
                }));
            })
            .await;

        let page2 = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/notams")
                    .query_param("pageNum", "2");
                then.status(200).json_body(json!({
                    "pageSize": 2,
                    "pageNum": 2,
                    "totalCount": 3,
                    "totalPages": 2,
                    "items": [faa_item("N3", "CRANE OPR", "E) CRANE OPR")]
                }));
            })
            .await;

        let source = faa_source(server.base_url());
        let location = Location::parse("VHHH").unwrap();
        let records = source.fetch_all(&location).await.unwrap();

        page1.assert_async().await;
        page2.assert_async().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "N1");
        assert_eq!(records[0].full_icao, "E) RWY 07R/25L CLSD");
        assert_eq!(records[0].end, "PERM");
        assert_eq!(records[2].text, "CRANE OPR");
    }

    #[tokio::test]
    async fn test_faa_source_http_error_is_fetch_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/notams");
                then.status(401).body("unauthorized");
            })
            .await;

        let source = faa_source(server.base_url());
        let location = Location::parse("KJFK").unwrap();
        let result = source.fetch_all(&location).await;
        assert!(matches!(result, Err(AppError::Fetch { ref location, .. }) if location == "KJFK"));
    }

    #[tokio::test]
    async fn test_directory_source_reads_location_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("KJFK.json"),
            r#"[{"id": "A1", "text": "RWY 04R CLSD", "full_icao": null, "start": "", "end": ""}]"#,
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let records = source
            .fetch_all(&Location::parse("kjfk").unwrap())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_icao, "");
    }

    #[tokio::test]
    async fn test_directory_source_missing_file_is_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        let result = source.fetch_all(&Location::parse("EGLL").unwrap()).await;
        assert!(matches!(result, Err(AppError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_search_filters_fetched_records() {
        let source = MockSource::default().with(
            "KJFK",
            vec![record("1", "RWY 04R CLSD"), record("2", "CRANE OPR")],
        );
        let location = Location::parse("KJFK").unwrap();

        let runway = source
            .search(&location, QueryMode::Runway, "04R", false)
            .await
            .unwrap();
        assert_eq!(runway.len(), 1);

        let all = source.search(&location, QueryMode::All, "ignored", false).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_search_invalid_pattern_skips_fetch() {
        let source = MockSource::default().with("KJFK", vec![record("1", "CRANE")]);
        let location = Location::parse("KJFK").unwrap();
        let result = source.search(&location, QueryMode::Keyword, "(", true).await;
        assert!(matches!(result, Err(AppError::InvalidPattern { .. })));
        assert_eq!(source.calls("KJFK"), 0);
    }
}
