//! Push-based rewriting core.
//!
//! # Responsibilities
//! - Build a `lol_html::send::HtmlRewriter` from the binding table
//! - Run matching visitors in registration order and apply their edits
//! - Collect output between writes so callers can stream it
//!
//! # Design Decisions
//! - Every element matched by any binding is bracketed by two `*` handlers:
//!   the first clears the content ledger, the last writes it out
//! - Handler errors travel through lol_html boxed and are unboxed on return
//! - After a failure lol_html must not be touched again, so the rewriter
//!   refuses further input itself

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use lol_html::{send, HandlerResult, OutputSink, Selector};

use crate::rewrite::element::{ContentLedger, Element, Owner};
use crate::rewrite::pipeline::{ElementVisitor, SelectorBinding};
use crate::rewrite::RewriteError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Output sink shared with the rewriter that owns it.
#[derive(Clone, Default)]
struct OutputBuffer(Arc<Mutex<BytesMut>>);

impl OutputSink for OutputBuffer {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        lock(&self.0).extend_from_slice(chunk);
    }
}

type Handlers = Vec<(Cow<'static, Selector>, send::ElementContentHandlers<'static>)>;

/// Rewrites one document. Create a fresh one per request.
pub struct Rewriter<V: ElementVisitor> {
    inner: Option<send::HtmlRewriter<'static, OutputBuffer>>,
    output: OutputBuffer,
    _visitor: PhantomData<fn() -> V>,
}

impl<V: ElementVisitor> Rewriter<V> {
    pub fn new(
        bindings: Arc<[SelectorBinding<V>]>,
        context: Arc<V::Context>,
    ) -> Result<Self, RewriteError> {
        let output = OutputBuffer::default();
        let settings = send::Settings {
            element_content_handlers: element_handlers(bindings, context)?,
            ..send::Settings::new_send()
        };
        Ok(Self {
            inner: Some(send::HtmlRewriter::new(settings, output.clone())),
            output,
            _visitor: PhantomData,
        })
    }

    /// Process one input chunk. Output becomes available via [`take_output`](Self::take_output).
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), RewriteError> {
        let inner = self.inner.as_mut().ok_or(RewriteError::Poisoned)?;
        if let Err(e) = inner.write(chunk) {
            self.inner = None;
            return Err(e.into());
        }
        Ok(())
    }

    /// Signal end of input, flushing anything lol_html still holds.
    pub fn end(&mut self) -> Result<(), RewriteError> {
        let inner = self.inner.take().ok_or(RewriteError::Poisoned)?;
        inner.end().map_err(RewriteError::from)
    }

    /// Output produced since the last call.
    pub fn take_output(&mut self) -> Bytes {
        lock(&self.output.0).split().freeze()
    }
}

fn element_handlers<V: ElementVisitor>(
    bindings: Arc<[SelectorBinding<V>]>,
    context: Arc<V::Context>,
) -> Result<Handlers, RewriteError> {
    if bindings.is_empty() {
        return Ok(Vec::new());
    }
    let any: Selector = "*".parse()?;
    let ledger = Arc::new(Mutex::new(ContentLedger::default()));
    let mut handlers: Handlers = Vec::with_capacity(bindings.len() + 2);

    let reset = Arc::clone(&ledger);
    handlers.push((
        Cow::Owned(any.clone()),
        send::ElementContentHandlers::default().element(
            move |_: &mut send::Element<'_, '_>| -> HandlerResult {
                lock(&reset).reset();
                Ok(())
            },
        ),
    ));

    for index in 0..bindings.len() {
        let selector = Cow::Owned(bindings[index].selector.clone());
        let bindings = Arc::clone(&bindings);
        let context = Arc::clone(&context);
        let ledger = Arc::clone(&ledger);
        handlers.push((
            selector,
            send::ElementContentHandlers::default().element(
                move |el: &mut send::Element<'_, '_>| -> HandlerResult {
                    let binding = &bindings[index];
                    let owner = Owner {
                        index,
                        selector: Arc::clone(&binding.source),
                    };
                    let tag_name = el.tag_name();
                    let mut queue = lock(&ledger);
                    let mut element = Element::new(el, &mut queue, owner);
                    binding
                        .visitor
                        .on_element_open(&mut element, &context)
                        .map_err(|source| match source.downcast::<RewriteError>() {
                            Ok(rewrite) => *rewrite,
                            Err(source) => RewriteError::Visitor {
                                selector: binding.source.to_string(),
                                element: tag_name,
                                source,
                            },
                        })?;
                    Ok(())
                },
            ),
        ));
    }

    handlers.push((
        Cow::Owned(any),
        send::ElementContentHandlers::default().element(
            move |el: &mut send::Element<'_, '_>| -> HandlerResult {
                lock(&ledger).apply(el);
                Ok(())
            },
        ),
    ));

    Ok(handlers)
}
