//! Edge handler for a single links page.
//!
//! Routes requests by method and wildcard path pattern, serves the link list
//! as JSON, and renders the page by streaming an upstream HTML shell through
//! selector-scoped rewriting visitors.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod links;
pub mod observability;
pub mod page;
pub mod rewrite;
pub mod routing;
pub mod upstream;

pub use config::EdgeConfig;
pub use error::EdgeError;
pub use http::{HttpServer, RequestDispatcher};
pub use lifecycle::Shutdown;
