//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up the first route matching method and path
//! - Invoke its handler, or answer 404 without invoking anything
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan (acceptable for the handful of routes a site has)
//! - Method compared case-insensitively, path case-sensitively
//! - No retries or timeouts here; handlers and middleware own those

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::error::EdgeError;
use crate::routing::pattern::{PathPattern, PatternError};

/// Future returned by a [`RequestHandler`].
pub type HandlerFuture = BoxFuture<'static, Response>;

/// Something that turns a request into a response.
///
/// Implemented for any `Fn(Request<Body>) -> impl Future<Output = Response>`.
pub trait RequestHandler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>) -> HandlerFuture;
}

impl<F, Fut> RequestHandler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request<Body>) -> HandlerFuture {
        Box::pin(self(request))
    }
}

/// A registered route.
pub struct RouteEntry {
    method: Method,
    pattern: PathPattern,
    handler: Arc<dyn RequestHandler>,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    fn accepts(&self, method: &Method, path: &str) -> bool {
        self.method.as_str().eq_ignore_ascii_case(method.as_str()) && self.pattern.matches(path)
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered method + pattern router.
#[derive(Debug, Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier registrations shadow later ones.
    pub fn register<H>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, PatternError>
    where
        H: RequestHandler,
    {
        let pattern = PathPattern::parse(pattern)?;
        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.entries.push(RouteEntry {
            method,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    /// Shorthand for `register(Method::GET, ..)`.
    pub fn get<H>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError>
    where
        H: RequestHandler,
    {
        self.register(Method::GET, pattern, handler)
    }

    /// Find the first entry accepting this method and path.
    pub fn find(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.accepts(method, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route the request to the first matching handler.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_string();
        match self.find(request.method(), &path) {
            Some(entry) => entry.handler.call(request).await,
            None => EdgeError::RouteNotFound {
                method: request.method().to_string(),
                path,
            }
            .into_response(),
        }
    }
}
