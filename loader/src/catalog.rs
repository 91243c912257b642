//! Character listing
//!
//! Fetches the first page of the listing only. Entries carry the identifier used to
//! open their detail view.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{Result, Subject};
use crate::transport::{Transport, fetch_record};
use crate::view_model::trailing_number;

/// One entry of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier of the detail record; empty when none could be derived
    pub uid:  String,
    /// Display name
    pub name: String,
    /// Absolute URL of the detail record
    pub url:  String,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    results: Vec<CatalogRecord>,
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    name: String,
    url:  String,
    #[serde(default)]
    uid:  Option<String>,
}

impl From<CatalogRecord> for CatalogEntry {
    fn from(record: CatalogRecord) -> Self {
        // Some API mirrors send `uid`; otherwise it is the trailing number of `url`
        let uid = record
            .uid
            .filter(|uid| !uid.is_empty())
            .or_else(|| trailing_number(&record.url).map(str::to_string))
            .unwrap_or_default();

        Self {
            uid,
            name: record.name,
            url: record.url,
        }
    }
}

/// Client for the listing endpoint
#[derive(Debug)]
pub struct CatalogClient<T> {
    transport: Arc<T>,
    config:    ApiConfig,
}

impl<T: Transport> CatalogClient<T> {
    /// Create a client sharing the given transport
    pub const fn new(transport: Arc<T>, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// Fetch the first page of the listing
    pub async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>> {
        let url = self.config.catalog_url();
        let page: CatalogPage = fetch_record(self.transport.as_ref(), Subject::Catalog, &url, &url)
            .await
            .inspect_err(|report| warn!("Catalog load failed: {report:?}"))?;

        let entries: Vec<CatalogEntry> = page.results.into_iter().map(CatalogEntry::from).collect();
        if entries.iter().any(|entry| entry.uid.is_empty()) {
            warn!("Some catalog entries have no identifier and cannot be opened");
        }
        debug!("Loaded {} catalog entries", entries.len());

        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::testing::{BASE_URL, ScriptedTransport};
    use crate::transport::{FetchResponse, TransportError};

    fn client(transport: &Arc<ScriptedTransport>) -> CatalogClient<ScriptedTransport> {
        CatalogClient::new(Arc::clone(transport), ApiConfig::new(BASE_URL).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_entries_derives_uids() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "https://swapi.test/api/people/",
            FetchResponse::ok(
                json!({
                    "count": 82,
                    "next": "https://swapi.test/api/people/?page=2",
                    "results": [
                        { "name": "Luke Skywalker", "url": "https://swapi.test/api/people/1/" },
                        { "name": "C-3PO", "url": "https://swapi.test/api/people/2/", "uid": "2" },
                        { "name": "Unknown", "url": "https://swapi.test/api/people/x" }
                    ]
                })
                .to_string(),
            ),
        );

        let entries = client(&transport).fetch_entries().await.unwrap();

        let uids: Vec<_> = entries.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, ["1", "2", ""]);
        assert_eq!(entries[0].name, "Luke Skywalker");
        assert_eq!(transport.calls(), vec!["https://swapi.test/api/people/".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_entries_failures_are_classified() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail("https://swapi.test/api/people/", TransportError::Connectivity);

        let err = client(&transport).fetch_entries().await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            Error::Connectivity {
                subject: Subject::Catalog,
                ..
            }
        ));
        assert!(err.current_context().reason().contains("character listing"));
    }
}
