//! HTTP transport seam
//!
//! The loader never talks to `reqwest` directly. It goes through [`Transport`], which
//! separates two failure modes:
//! - a response with a non-success status, returned as an ordinary [`FetchResponse`]
//! - a transport-level fault (DNS, refused connection, broken body), returned as a
//!   [`TransportError`] report

mod http_client;
mod reqwest_transport;

use async_trait::async_trait;
use error_stack::Report;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub use reqwest_transport::HttpTransport;

use crate::error::{Error, Result, Subject};

/// Transport-level failure, distinct from a non-success response
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The remote service could not be reached
    #[error("could not reach the remote service")]
    Connectivity,
    /// The request or response failed for another reason
    #[error("transport failure")]
    Other,
}

/// Result of a single transport call
pub type TransportResult<T> = std::result::Result<T, Report<TransportError>>;

/// A fully received HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    status:      u16,
    status_text: String,
    body:        String,
}

impl FetchResponse {
    /// Create a response from its parts
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Create a `200 OK` response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, "OK", body)
    }

    /// Numeric HTTP status
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase for the status
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Raw response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the status is in the 2xx range
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parse the body as a JSON record
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Asynchronous `fetch(url)` primitive
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request and wait for the whole body
    async fn fetch(&self, url: &str) -> TransportResult<FetchResponse>;
}

/// Fetch one record and classify every failure against `subject`
///
/// `target` is how the requested record is named in failure reasons: `id 4` for a
/// character, the URL itself for a homeworld.
pub(crate) async fn fetch_record<R, T>(
    transport: &T,
    subject: Subject,
    url: &str,
    target: &str,
) -> Result<R>
where
    R: DeserializeOwned,
    T: Transport + ?Sized,
{
    debug!("Fetching {subject} from {url}");

    let response = transport.fetch(url).await.map_err(|report| {
        let context = match report.current_context() {
            TransportError::Connectivity => Error::connectivity(subject, target),
            TransportError::Other => {
                Error::unexpected(format!("transport failure while fetching {subject}"))
            },
        };
        report.change_context(context).attach(format!("URL: {url}"))
    })?;

    if !response.is_success() {
        return Err(Report::new(Error::rejected(
            subject,
            response.status(),
            response.status_text(),
            target,
        ))
        .attach(format!("URL: {url}")));
    }

    response.json::<R>().map_err(|e| {
        Report::new(Error::decode(subject, &e))
            .attach(format!("URL: {url}"))
            .attach(format!(
                "Body (first 200 chars): {}",
                response.body().chars().take(200).collect::<String>()
            ))
    })
}
