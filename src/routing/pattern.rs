//! Wildcard path patterns.
//!
//! A pattern is a sequence of literal runs and `*` wildcards, matched against
//! the full request path:
//! - `*` in leading or interior position matches a non-empty run of characters
//!   (path separators included), backtracking until the following literal fits
//! - a trailing `*` matches whatever remains of the path, including nothing
//! - everything else must match byte for byte (case-sensitive)
//!
//! ```text
//! "*/links"  matches "/site/links", "/a/b/links"; not "/links", "/site/links/"
//! "*/*"      matches "/site/other"; not "/other"
//! "/*"       matches "/", "/anything/at/all"
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern '{0}' has adjacent wildcards")]
    AdjacentWildcards(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Wildcard,
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
}

impl PathPattern {
    /// Compile a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if pattern.contains("**") {
            return Err(PatternError::AdjacentWildcards(pattern.to_string()));
        }

        let mut tokens = Vec::new();
        let mut literal = String::new();
        for c in pattern.chars() {
            if c == '*' {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Wildcard);
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// The pattern as written at registration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the whole path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match_tokens(&self.tokens, path.as_bytes())
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// Literals are valid UTF-8, so any offset where one matches is a char boundary.
fn match_tokens(tokens: &[Token], path: &[u8]) -> bool {
    match tokens.split_first() {
        None => path.is_empty(),
        Some((Token::Literal(lit), rest)) => {
            path.starts_with(lit.as_bytes()) && match_tokens(rest, &path[lit.len()..])
        }
        Some((Token::Wildcard, [])) => true,
        Some((Token::Wildcard, rest)) => {
            let next = match &rest[0] {
                Token::Literal(lit) => lit.as_bytes(),
                Token::Wildcard => return false,
            };
            (1..=path.len().saturating_sub(next.len()))
                .filter(|&start| path[start..].starts_with(next))
                .any(|start| match_tokens(rest, &path[start..]))
        }
    }
}
