//! HTTP upstream client with timeout and error handling.
//!
//! # Responsibilities
//! - Issue GET requests to the configured upstreams
//! - Map connect/total timeouts and non-2xx statuses to `UpstreamError`
//! - Hand document bodies back as streams without buffering them

use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt, TryStreamExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::TimeoutConfig;
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamDocument, UpstreamError};

/// `reqwest`-backed upstream client.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Build a client honouring the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("linkpage-edge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self { client })
    }

    async fn get(
        &self,
        url: &str,
        accept: &'static str,
        kind: &'static str,
    ) -> Result<reqwest::Response, UpstreamError> {
        tracing::debug!(url = %url, kind = kind, "Fetching upstream");

        let response = match self.client.get(url).header(ACCEPT, accept).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = UpstreamError::from_reqwest(url, e);
                tracing::warn!(url = %url, kind = kind, error = %err, "Upstream unreachable");
                metrics::record_upstream_fetch(kind, "error");
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, kind = kind, status = %status, "Upstream returned non-success status");
            metrics::record_upstream_fetch(kind, "status");
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        metrics::record_upstream_fetch(kind, "ok");
        Ok(response)
    }
}

impl UpstreamClient for HttpUpstream {
    fn fetch_document<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<UpstreamDocument, UpstreamError>> {
        async move {
            let response = self.get(url, "text/html", "document").await?;
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let owned_url = url.to_string();
            let body = response
                .bytes_stream()
                .map_err(move |e| UpstreamError::from_reqwest(&owned_url, e))
                .boxed();

            Ok(UpstreamDocument { content_type, body })
        }
        .boxed()
    }

    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, UpstreamError>> {
        async move {
            let response = self.get(url, "application/json", "json").await?;
            response
                .bytes()
                .await
                .map_err(|e| UpstreamError::from_reqwest(url, e))
        }
        .boxed()
    }
}
