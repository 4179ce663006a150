//! Streaming HTML rewriting on top of `lol_html`.
//!
//! # Data Flow
//! ```text
//! upstream body chunks
//!     → rewriter.rs (lol_html::send::HtmlRewriter, one element handler per binding)
//!         → element.rs (visitor facade, queued inner content per element)
//!     → output chunk per input chunk
//!     → pipeline.rs (Stream adapter, error ends the stream)
//! ```
//!
//! # Design Decisions
//! - Parsing, selector matching and serialization belong to lol_html; this
//!   module only adds visitor ordering and the content rules below
//! - Visitors run in registration order; a visitor replacing inner content
//!   that a different visitor already touched is an error, not a silent overwrite
//! - Output already yielded is never retracted; a failure ends the stream
//!   with an error item so the response cannot complete successfully

pub mod element;
pub mod pipeline;
pub mod rewriter;

use std::borrow::Cow;

use thiserror::Error;

pub use element::Element;
pub use lol_html::errors::SelectorError;
pub use lol_html::html_content::ContentType;
pub use pipeline::{ElementVisitor, SelectorBinding, TransformPipeline, VisitorError};
pub use rewriter::Rewriter;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a transform.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A visitor returned an error.
    #[error("visitor for `{selector}` failed on <{element}>: {source}")]
    Visitor {
        selector: String,
        element: String,
        #[source]
        source: VisitorError,
    },

    /// A visitor replaced inner content another visitor had already set or appended to.
    #[error("visitors for `{first}` and `{second}` both write the content of <{element}>")]
    VisitorConflict {
        element: String,
        first: String,
        second: String,
    },

    /// A visitor tried to give content to an element that cannot have any.
    #[error("visitor for `{selector}` inserted content into void element <{element}>")]
    ContentOnVoidElement { element: String, selector: String },

    /// A visitor used an attribute name HTML cannot carry.
    #[error("invalid attribute name `{name}`: {source}")]
    InvalidAttribute {
        name: String,
        #[source]
        source: lol_html::errors::AttributeNameError,
    },

    /// A selector failed to compile.
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// The input stream failed.
    #[error("input stream failed: {0}")]
    Source(#[source] BoxError),

    /// lol_html gave up on the document.
    #[error("rewriting failed: {0}")]
    Rewriting(#[source] lol_html::errors::RewritingError),

    /// The rewriter was used after it had already failed.
    #[error("rewriter already failed")]
    Poisoned,
}

impl From<lol_html::errors::RewritingError> for RewriteError {
    fn from(error: lol_html::errors::RewritingError) -> Self {
        match error {
            lol_html::errors::RewritingError::ContentHandlerError(source) => {
                match source.downcast::<RewriteError>() {
                    Ok(rewrite) => *rewrite,
                    Err(other) => RewriteError::Source(other),
                }
            }
            other => RewriteError::Rewriting(other),
        }
    }
}

/// Escape text for use between tags.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape a value for use inside a single- or double-quoted attribute.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, |c| match c {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        '<' => Some("&lt;"),
        _ => None,
    })
}

fn escape(input: &str, replace: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !input.chars().any(|c| replace(c).is_some()) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match replace(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"https://x/?a=1&b='2'"#),
            "https://x/?a=1&amp;b=&#39;2&#39;"
        );
        assert_eq!(escape_attribute(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
