//! Visitor bindings and the stream adapter around [`Rewriter`].

use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt, TryStreamExt};
use lol_html::Selector;

use crate::rewrite::element::Element;
use crate::rewrite::rewriter::Rewriter;
use crate::rewrite::{BoxError, RewriteError, SelectorError};

pub type VisitorError = BoxError;

/// Logic run on every start tag matched by the visitor's selector.
pub trait ElementVisitor: Send + Sync + 'static {
    /// Per-transform data the visitor reads.
    type Context: Send + Sync + 'static;

    fn on_element_open(
        &self,
        element: &mut Element<'_, '_, '_>,
        context: &Self::Context,
    ) -> Result<(), VisitorError>;
}

/// A visitor scoped to a selector.
#[derive(Clone)]
pub struct SelectorBinding<V> {
    pub(crate) source: Arc<str>,
    pub(crate) selector: Selector,
    pub(crate) visitor: V,
}

impl<V> SelectorBinding<V> {
    pub fn new(selector: &str, visitor: V) -> Result<Self, SelectorError> {
        Ok(Self {
            source: selector.into(),
            selector: selector.parse()?,
            visitor,
        })
    }

    /// The selector as written.
    pub fn selector(&self) -> &str {
        &self.source
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for SelectorBinding<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorBinding")
            .field("selector", &self.source)
            .field("visitor", &self.visitor)
            .finish()
    }
}

/// An ordered visitor table bound to one context.
pub struct TransformPipeline<V: ElementVisitor> {
    bindings: Arc<[SelectorBinding<V>]>,
    context: Arc<V::Context>,
}

impl<V: ElementVisitor> Clone for TransformPipeline<V> {
    fn clone(&self) -> Self {
        Self {
            bindings: Arc::clone(&self.bindings),
            context: Arc::clone(&self.context),
        }
    }
}

enum State<V: ElementVisitor> {
    Running {
        input: BoxStream<'static, Result<Bytes, RewriteError>>,
        rewriter: Rewriter<V>,
    },
    Failing(RewriteError),
    Done,
}

impl<V: ElementVisitor> TransformPipeline<V> {
    pub fn new(bindings: impl Into<Arc<[SelectorBinding<V>]>>, context: V::Context) -> Self {
        Self {
            bindings: bindings.into(),
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &V::Context {
        &self.context
    }

    pub fn rewriter(&self) -> Result<Rewriter<V>, RewriteError> {
        Rewriter::new(Arc::clone(&self.bindings), Arc::clone(&self.context))
    }

    /// Rewrite a byte stream.
    ///
    /// Yields output as soon as each input chunk has been processed. On
    /// failure, any output produced before the failure point is yielded
    /// first, then a single error item, then the stream ends.
    pub fn transform<S, E>(
        &self,
        input: S,
    ) -> impl Stream<Item = Result<Bytes, RewriteError>> + Send + 'static
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let input = input
            .map_err(|e| RewriteError::Source(e.into()))
            .boxed();
        let initial = match self.rewriter() {
            Ok(rewriter) => State::Running { input, rewriter },
            Err(e) => State::Failing(e),
        };

        stream::unfold(initial, |state| async move {
            match state {
                State::Running {
                    mut input,
                    mut rewriter,
                } => loop {
                    match input.next().await {
                        Some(Ok(chunk)) => {
                            if let Err(e) = rewriter.write(&chunk) {
                                return fail(&mut rewriter, e);
                            }
                            let output = rewriter.take_output();
                            if !output.is_empty() {
                                return Some((Ok(output), State::Running { input, rewriter }));
                            }
                        }
                        Some(Err(e)) => return fail(&mut rewriter, e),
                        None => {
                            if let Err(e) = rewriter.end() {
                                return fail(&mut rewriter, e);
                            }
                            let output = rewriter.take_output();
                            if output.is_empty() {
                                return None;
                            }
                            return Some((Ok(output), State::Done));
                        }
                    }
                },
                State::Failing(e) => Some((Err(e), State::Done)),
                State::Done => None,
            }
        })
    }

    /// Rewrite a complete document held in memory.
    pub fn transform_bytes(&self, input: &[u8]) -> Result<Vec<u8>, RewriteError> {
        let mut rewriter = self.rewriter()?;
        rewriter.write(input)?;
        rewriter.end()?;
        Ok(rewriter.take_output().to_vec())
    }
}

fn fail<V: ElementVisitor>(
    rewriter: &mut Rewriter<V>,
    error: RewriteError,
) -> Option<(Result<Bytes, RewriteError>, State<V>)> {
    let partial = rewriter.take_output();
    if partial.is_empty() {
        Some((Err(error), State::Done))
    } else {
        Some((Ok(partial), State::Failing(error)))
    }
}
