//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::EdgeConfig;
use crate::http::{DispatcherError, HttpServer, RequestDispatcher};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::upstream::{HttpUpstream, UpstreamClient, UpstreamError};

/// Errors that stop the process from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid {field} `{value}`")]
    Address { field: &'static str, value: String },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Dispatcher(#[from] DispatcherError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the server for `config` without binding anything.
pub fn build_server(config: EdgeConfig) -> Result<HttpServer, StartupError> {
    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstream::new(&config.timeouts)?);
    let dispatcher = RequestDispatcher::from_config(upstream, &config)?;
    Ok(HttpServer::new(config, dispatcher))
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn start(config: EdgeConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse().map_err(|_| {
            StartupError::Address {
                field: "observability.metrics_address",
                value: config.observability.metrics_address.clone(),
            }
        })?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = build_server(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
