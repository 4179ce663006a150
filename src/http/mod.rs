//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum app, middleware)
//!     → request.rs (request ID set / propagated)
//!     → dispatch.rs (route table, metrics)
//!     → links / page handlers
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod server;

pub use dispatch::{DispatcherError, RequestDispatcher};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
