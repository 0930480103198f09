//! A stream collected on first demand.

use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::Stream;
use pin_project_lite::pin_project;
use tracing::trace;

pin_project! {
    /// A source stream that is drained into `C` the first time it is forced.
    ///
    /// The source is not polled until [`poll_force`](Self::poll_force) is
    /// called; once collected the source is dropped and the collection is
    /// handed out on every later call.
    #[project = MaterializedProjection]
    pub(crate) enum Materialized<S, C> {
        Collecting {
            #[pin]
            source: S,
            collection: C,
        },
        Ready {
            collection: C,
        },
    }
}

impl<S, C> Materialized<S, C>
where
    S: Stream,
    C: Default + Extend<S::Item>,
{
    pub(crate) fn new(source: S) -> Self {
        Self::Collecting {
            source,
            collection: C::default(),
        }
    }

    pub(crate) fn poll_force(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<&mut C> {
        if let MaterializedProjection::Collecting { mut source, collection } = self.as_mut().project() {
            while let Some(item) = ready!(source.as_mut().poll_next(cx)) {
                collection.extend(Some(item));
            }
            let collection = mem::take(collection);
            trace!("materialized stream source");
            self.set(Self::Ready { collection });
        }
        match self.project() {
            MaterializedProjection::Ready { collection } => Poll::Ready(collection),
            MaterializedProjection::Collecting { .. } => unreachable!("source was just collected"),
        }
    }
}
