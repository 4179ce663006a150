//! The rendered links page.
//!
//! # Data Flow
//! ```text
//! page request
//!     → handler.rs (shell fetch ∥ link resolve, joined)
//!     → context.rs (links + profile values for this request)
//!     → visitors.rs (fixed selector table)
//!     → rewrite::TransformPipeline (streamed response body)
//! ```

pub mod context;
pub mod handler;
pub mod visitors;

pub use context::TransformContext;
pub use handler::{PageHandler, HTML_CONTENT_TYPE};
pub use visitors::{page_bindings, PageVisitor, PAGE_TABLE};
