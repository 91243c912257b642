//! `reqwest`-backed transport
//!
//! Sends GET requests through the shared pooled client and classifies `reqwest`
//! errors into connectivity faults and everything else.

use async_trait::async_trait;
use error_stack::Report;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use super::http_client::get_client;
use super::{FetchResponse, Transport, TransportError, TransportResult};

/// HTTP transport used against the real upstream service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a transport backed by the shared pooled client
    pub fn new() -> Self {
        Self {
            client: get_client().clone(),
        }
    }

    /// Create a transport with a caller-configured client
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Classify a `reqwest` error with detailed context
    fn handle_error(e: &reqwest::Error, url: &str) -> Report<TransportError> {
        // Always log HTTP errors to help debug intermittent failures
        warn!("HTTP request failed - url={url}, error={e}");

        // Determine error type and details
        let (context, error_type) = if e.is_connect() {
            (TransportError::Connectivity, "Connection failed")
        } else if e.is_timeout() {
            (TransportError::Connectivity, "Timeout")
        } else if e.is_request() {
            (TransportError::Other, "Request error")
        } else if e.is_body() {
            (TransportError::Other, "Body error")
        } else if e.is_decode() {
            (TransportError::Other, "Decode error")
        } else {
            (TransportError::Other, "Unknown error type")
        };

        Report::new(context)
            .attach(format!("Error type: {error_type}"))
            .attach(format!("URL: {url}"))
            .attach(format!("Full error: {e:?}"))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> TransportResult<FetchResponse> {
        debug!("HTTP GET {url}");

        let response = match self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return Err(Self::handle_error(&e, url)),
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown status");
        if !status.is_success() {
            warn!("HTTP status error - url={url}, status={status}");
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::handle_error(&e, url))?;

        debug!("HTTP GET {url} - status={status}, {} bytes", body.len());

        Ok(FetchResponse::new(status.as_u16(), status_text, body))
    }
}
