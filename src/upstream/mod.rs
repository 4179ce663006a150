//! Upstream collaborators.
//!
//! # Data Flow
//! ```text
//! PageHandler / LinkDataHandler
//!     → UpstreamClient::fetch_document (HTML shell, streamed)
//!     → UpstreamClient::fetch_json (link list, buffered)
//!     → client.rs (reqwest, connect + total timeouts, status check)
//! ```
//!
//! # Design Decisions
//! - Trait seam so handlers can be exercised without a network
//! - Non-2xx is an error; callers never see a failed upstream body
//! - Document bodies stay streams; dropping one releases its connection
//! - No retries

pub mod client;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use thiserror::Error;

pub use client::HttpUpstream;

/// Errors raised while talking to an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, protocol or body read failure.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream did not answer in time.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The upstream answered with a non-2xx status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
            }
        } else {
            UpstreamError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// A fetched HTML document whose body has not been read yet.
pub struct UpstreamDocument {
    /// `content-type` header as sent by the upstream.
    pub content_type: Option<String>,

    /// Body chunks in arrival order.
    pub body: BoxStream<'static, Result<Bytes, UpstreamError>>,
}

impl std::fmt::Debug for UpstreamDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamDocument")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Fetches remote documents and JSON payloads.
pub trait UpstreamClient: Send + Sync + 'static {
    /// Start fetching an HTML document; resolves once headers are in.
    fn fetch_document<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<UpstreamDocument, UpstreamError>>;

    /// Fetch a JSON payload in full.
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, UpstreamError>>;
}
