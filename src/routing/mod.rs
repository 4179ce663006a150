//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, pattern, handler)
//!     → pattern.rs (compile wildcard pattern)
//!     → router.rs (append to ordered entry list)
//!     → Freeze behind Arc, immutable from here on
//!
//! Incoming Request (method, path)
//!     → router.rs (scan entries in registration order)
//!     → pattern.rs (test compiled pattern against full path)
//!     → Invoke first matching handler, or 404
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (literal/wildcard tokens only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod pattern;
pub mod router;

pub use pattern::{PathPattern, PatternError};
pub use router::{HandlerFuture, RequestHandler, RouteEntry, Router};
