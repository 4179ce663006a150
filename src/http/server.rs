//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that hands every request to the dispatcher
//! - Wire up middleware (timeout, request ID, tracing)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, extract::State, http::Request, response::Response, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::http::dispatch::RequestDispatcher;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};

/// HTTP server for the edge handler.
pub struct HttpServer {
    app: Router,
    config: EdgeConfig,
}

impl HttpServer {
    pub fn new(config: EdgeConfig, dispatcher: RequestDispatcher) -> Self {
        let app = Self::build_app(&config, Arc::new(dispatcher));
        Self { app, config }
    }

    /// Build the Axum app with all middleware layers.
    ///
    /// Layers run outermost first: request ID, trace span, ID propagation,
    /// timeout, then the dispatcher.
    #[allow(deprecated)]
    fn build_app(config: &EdgeConfig, dispatcher: Arc<RequestDispatcher>) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(dispatcher)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = request.request_id().unwrap_or("-"),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The app, for driving in-process.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn dispatch_handler(
    State(dispatcher): State<Arc<RequestDispatcher>>,
    request: Request<Body>,
) -> Response {
    dispatcher.handle(request).await
}
