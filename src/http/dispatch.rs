//! Top-level request dispatch.
//!
//! # Responsibilities
//! - Build the route table once at startup
//! - Route every incoming request and record its outcome
//!
//! # Route table
//! ```text
//! GET /links     → LinkDataHandler
//! GET */links    → LinkDataHandler
//! GET /*         → PageHandler
//! anything else  → 404
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use thiserror::Error;

use crate::config::EdgeConfig;
use crate::http::request::RequestIdExt;
use crate::links::LinkDataHandler;
use crate::observability::metrics;
use crate::page::PageHandler;
use crate::rewrite::SelectorError;
use crate::routing::{PatternError, Router};
use crate::upstream::UpstreamClient;

/// Errors building the dispatcher.
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("invalid route pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("invalid page selector: {0}")]
    Selector(#[from] SelectorError),
}

/// Routes requests to the link and page handlers.
#[derive(Debug)]
pub struct RequestDispatcher {
    router: Router,
}

impl RequestDispatcher {
    pub fn new(links: LinkDataHandler, page: PageHandler) -> Result<Self, PatternError> {
        let links = Arc::new(links);
        let page = Arc::new(page);
        let mut router = Router::new();

        for pattern in ["/links", "*/links"] {
            let links = Arc::clone(&links);
            router.get(pattern, move |_request: Request<Body>| {
                let links = Arc::clone(&links);
                async move { links.respond().await }
            })?;
        }
        router.get("/*", move |_request: Request<Body>| {
            let page = Arc::clone(&page);
            async move { page.respond().await }
        })?;

        Ok(Self { router })
    }

    pub fn from_config(
        upstream: Arc<dyn UpstreamClient>,
        config: &EdgeConfig,
    ) -> Result<Self, DispatcherError> {
        let links = LinkDataHandler::from_config(Arc::clone(&upstream), config);
        let page = PageHandler::from_config(upstream, links.clone(), config)?;
        Ok(Self::new(links, page)?)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Route one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let request_id = request.request_id().unwrap_or("-").to_string();
        let route = self
            .router
            .find(&method, &path)
            .map(|entry| entry.pattern().as_str().to_string())
            .unwrap_or_else(|| "none".to_string());

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            route = %route,
            "Dispatching request"
        );

        let response = self.router.dispatch(request).await;
        let status = response.status();
        metrics::record_request(&route, status.as_u16(), start);

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            route = %route,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
        response
    }
}
