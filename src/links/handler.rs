//! Link resolution and the `/links` endpoint.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::{EdgeConfig, LinkSource};
use crate::error::EdgeError;
use crate::links::LinkCollection;
use crate::upstream::UpstreamClient;

/// Resolves the site's link list and serves it as JSON.
#[derive(Clone)]
pub struct LinkDataHandler {
    upstream: Arc<dyn UpstreamClient>,
    source: LinkSource,
    links_url: String,
}

impl LinkDataHandler {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        source: LinkSource,
        links_url: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            source,
            links_url: links_url.into(),
        }
    }

    pub fn from_config(upstream: Arc<dyn UpstreamClient>, config: &EdgeConfig) -> Self {
        Self::new(upstream, config.links.clone(), config.upstream.links_url.clone())
    }

    /// Fetch and normalize the current link list.
    pub async fn resolve(&self) -> Result<LinkCollection, EdgeError> {
        let links = match &self.source {
            LinkSource::Static { links } => LinkCollection::new(links.clone())?,
            LinkSource::Upstream => {
                let payload = self.upstream.fetch_json(&self.links_url).await?;
                LinkCollection::parse(&payload)?
            }
        };
        tracing::debug!(count = links.len(), "Link data resolved");
        Ok(links)
    }

    /// `application/json` response for the `/links` route.
    pub async fn respond(&self) -> Response {
        match self.resolve().await {
            Ok(links) => Json(links).into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl std::fmt::Debug for LinkDataHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkDataHandler")
            .field("source", &self.source)
            .field("links_url", &self.links_url)
            .finish_non_exhaustive()
    }
}
