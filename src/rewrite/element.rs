//! Element handle given to visitors.
//!
//! Wraps the lol_html element for the duration of one visitor call.
//! Attribute edits and `before`/`after` go straight to lol_html. Inner content
//! is queued on a per-element [`ContentLedger`] so ownership can be checked
//! across visitors; the rewriter writes it out once every visitor has run.

use std::sync::Arc;

use lol_html::send;

use crate::rewrite::{ContentType, RewriteError};

pub(crate) const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// The visitor that queued a piece of content.
#[derive(Debug, Clone)]
pub(crate) struct Owner {
    pub(crate) index: usize,
    pub(crate) selector: Arc<str>,
}

/// Inner content queued for the element currently being visited.
#[derive(Default)]
pub(crate) struct ContentLedger {
    replacement: Option<(Owner, String, ContentType)>,
    appended: Vec<(Owner, String, ContentType)>,
}

impl ContentLedger {
    pub(crate) fn reset(&mut self) {
        self.replacement = None;
        self.appended.clear();
    }

    fn append(&mut self, owner: Owner, content: &str, content_type: ContentType) {
        self.appended.push((owner, content.to_string(), content_type));
    }

    /// Replace the inner content, or report the visitor whose content would be lost.
    fn replace(
        &mut self,
        owner: Owner,
        content: &str,
        content_type: ContentType,
    ) -> Result<(), Owner> {
        if let Some((previous, _, _)) = &self.replacement {
            if previous.index != owner.index {
                return Err(previous.clone());
            }
        }
        if let Some((other, _, _)) = self.appended.iter().find(|(o, _, _)| o.index != owner.index)
        {
            return Err(other.clone());
        }
        self.appended.clear();
        self.replacement = Some((owner, content.to_string(), content_type));
        Ok(())
    }

    /// Write the queued content into the element.
    pub(crate) fn apply(&mut self, element: &mut send::Element<'_, '_>) {
        if let Some((_, content, content_type)) = self.replacement.take() {
            element.set_inner_content(&content, content_type);
        }
        for (_, content, content_type) in self.appended.drain(..) {
            element.append(&content, content_type);
        }
    }
}

/// A start tag matched by a visitor's selector.
pub struct Element<'a, 'r, 't> {
    inner: &'a mut send::Element<'r, 't>,
    ledger: &'a mut ContentLedger,
    owner: Owner,
}

impl<'a, 'r, 't> Element<'a, 'r, 't> {
    pub(crate) fn new(
        inner: &'a mut send::Element<'r, 't>,
        ledger: &'a mut ContentLedger,
        owner: Owner,
    ) -> Self {
        Self {
            inner,
            ledger,
            owner,
        }
    }

    /// Lowercased tag name.
    pub fn tag_name(&self) -> String {
        self.inner.tag_name()
    }

    /// True for elements that never have children (`img`, `br`, ...).
    ///
    /// A trailing slash on any other tag does not make it void.
    pub fn is_void(&self) -> bool {
        let name = self.inner.tag_name();
        VOID_ELEMENTS.contains(&name.as_str())
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner.get_attribute(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.has_attribute(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), RewriteError> {
        self.inner
            .set_attribute(name, value)
            .map_err(|source| RewriteError::InvalidAttribute {
                name: name.to_string(),
                source,
            })
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.inner.remove_attribute(name);
    }

    /// Insert content immediately before the start tag.
    pub fn before(&mut self, content: &str, content_type: ContentType) {
        self.inner.before(content, content_type);
    }

    /// Insert content immediately after the element's end tag.
    pub fn after(&mut self, content: &str, content_type: ContentType) {
        self.inner.after(content, content_type);
    }

    /// Replace all children of the element.
    ///
    /// Calling it again from the same visitor replaces the previous value and
    /// drops that visitor's earlier appends. Content from any other visitor
    /// makes this a conflict.
    pub fn set_inner_content(
        &mut self,
        content: &str,
        content_type: ContentType,
    ) -> Result<(), RewriteError> {
        self.check_content()?;
        self.ledger
            .replace(self.owner.clone(), content, content_type)
            .map_err(|first| RewriteError::VisitorConflict {
                element: self.inner.tag_name(),
                first: first.selector.to_string(),
                second: self.owner.selector.to_string(),
            })
    }

    /// Add content after the element's existing children.
    pub fn append(&mut self, content: &str, content_type: ContentType) -> Result<(), RewriteError> {
        self.check_content()?;
        self.ledger.append(self.owner.clone(), content, content_type);
        Ok(())
    }

    fn check_content(&self) -> Result<(), RewriteError> {
        if self.is_void() {
            return Err(RewriteError::ContentOnVoidElement {
                element: self.inner.tag_name(),
                selector: self.owner.selector.to_string(),
            });
        }
        Ok(())
    }
}
