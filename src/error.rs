//! Request-level error type.
//!
//! Every failure a handler can hit ends up here and is mapped to a status
//! code. Nothing is replaced with a default: a page that cannot get its links
//! is not rendered at all.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::rewrite::RewriteError;
use crate::upstream::UpstreamError;

/// Errors surfaced to the request caller.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// No registered route accepts the request.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// An upstream collaborator failed (network, timeout, non-2xx).
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] UpstreamError),

    /// The link payload is not a well-formed link collection.
    #[error("malformed link data: {0}")]
    MalformedLinkData(String),

    /// The transform pipeline failed before any output was produced.
    #[error("transform failed: {0}")]
    Transform(#[from] RewriteError),

    /// The transform pipeline failed after output was already flushed.
    #[error("response stream aborted: {0}")]
    StreamAbort(#[source] RewriteError),
}

impl EdgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            EdgeError::UpstreamFetch(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            EdgeError::MalformedLinkData(_) => StatusCode::BAD_GATEWAY,
            EdgeError::Transform(_) | EdgeError::StreamAbort(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        let body = match &self {
            EdgeError::RouteNotFound { .. } => "Not Found",
            EdgeError::UpstreamFetch(_) | EdgeError::MalformedLinkData(_) => {
                "Upstream request failed"
            }
            EdgeError::Transform(_) | EdgeError::StreamAbort(_) => "Page transform failed",
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain;charset=UTF-8")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = EdgeError::RouteNotFound {
            method: "GET".into(),
            path: "/x".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "no route for GET /x");

        let err = EdgeError::UpstreamFetch(UpstreamError::Status {
            url: "https://a".into(),
            status: 500,
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = EdgeError::MalformedLinkData("missing url".into());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = EdgeError::UpstreamFetch(UpstreamError::Timeout {
            url: "https://a".into(),
        });
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_response_hides_details() {
        let res = EdgeError::MalformedLinkData("entry 3 is missing `url`".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain;charset=UTF-8"
        );
    }
}
