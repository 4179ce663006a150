//! Page rendering.
//!
//! # Responsibilities
//! - Fetch the HTML shell and the link list concurrently
//! - Bind the resolved links into a fresh transform context
//! - Stream the rewritten shell back as `text/html`
//!
//! # Design Decisions
//! - Either fetch failing fails the request; no page without links
//! - The response is only committed once the first output chunk exists, so
//!   failures on the first chunk still get a proper status code
//! - Later failures abort the body; bytes already sent stay sent

use std::sync::Arc;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::{stream, StreamExt, TryStreamExt};

use crate::config::{EdgeConfig, ProfileConfig};
use crate::error::EdgeError;
use crate::links::LinkDataHandler;
use crate::observability::metrics;
use crate::page::{page_bindings, PageVisitor, TransformContext};
use crate::rewrite::{RewriteError, SelectorBinding, SelectorError, TransformPipeline};
use crate::upstream::{UpstreamClient, UpstreamError};

pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Renders the page for every non-`/links` request.
#[derive(Clone)]
pub struct PageHandler {
    upstream: Arc<dyn UpstreamClient>,
    links: LinkDataHandler,
    shell_url: String,
    profile: Arc<ProfileConfig>,
    bindings: Arc<[SelectorBinding<PageVisitor>]>,
}

impl PageHandler {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        links: LinkDataHandler,
        shell_url: impl Into<String>,
        profile: ProfileConfig,
    ) -> Result<Self, SelectorError> {
        Ok(Self {
            upstream,
            links,
            shell_url: shell_url.into(),
            profile: Arc::new(profile),
            bindings: page_bindings()?.into(),
        })
    }

    pub fn from_config(
        upstream: Arc<dyn UpstreamClient>,
        links: LinkDataHandler,
        config: &EdgeConfig,
    ) -> Result<Self, SelectorError> {
        Self::new(
            upstream,
            links,
            config.upstream.shell_url.clone(),
            config.profile.clone(),
        )
    }

    /// Fetch, rewrite and start streaming the page.
    pub async fn render(&self) -> Result<Response, EdgeError> {
        let fetch_shell = async {
            self.upstream
                .fetch_document(&self.shell_url)
                .await
                .map_err(EdgeError::from)
        };
        let (document, links) = tokio::try_join!(fetch_shell, self.links.resolve())?;

        match document.content_type.as_deref() {
            Some(ct) if ct.trim_start().starts_with("text/html") => {}
            other => tracing::warn!(
                url = %self.shell_url,
                content_type = ?other,
                "Shell document is not text/html; rewriting anyway"
            ),
        }

        let context = TransformContext::new(links, &self.profile);
        let pipeline = TransformPipeline::new(Arc::clone(&self.bindings), context);
        let mut output = Box::pin(pipeline.transform(document.body));

        let first = match output.next().await {
            Some(Ok(chunk)) => Some(chunk),
            Some(Err(RewriteError::Source(source))) => {
                return Err(match source.downcast::<UpstreamError>() {
                    Ok(upstream) => EdgeError::UpstreamFetch(*upstream),
                    Err(other) => EdgeError::Transform(RewriteError::Source(other)),
                });
            }
            Some(Err(e)) => return Err(EdgeError::Transform(e)),
            None => None,
        };

        let body = stream::iter(first.map(Ok))
            .chain(output)
            .inspect_err(|e| {
                metrics::record_stream_abort();
                tracing::error!(error = %e, "Aborting page stream");
            })
            .map_err(EdgeError::StreamAbort);

        Ok(([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], Body::from_stream(body)).into_response())
    }

    pub async fn respond(&self) -> Response {
        match self.render().await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}

impl std::fmt::Debug for PageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandler")
            .field("shell_url", &self.shell_url)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}
