//! Lazy joins over streams.
//!
//! Mirrors the iterator engines: [`GroupJoinOkStream`] and [`JoinOkStream`]
//! work on an outer stream of `Result`, and the inner stream is collected into
//! a [`Lookup`] when the first outer success arrives. An outer element that
//! arrives while the inner stream is still being collected is held and
//! matched on the next poll.

use std::convert::Infallible;
use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::StreamExt;
use futures::stream::{Map, Stream};
use pin_project_lite::pin_project;

use crate::join::Lookup;
use crate::join::iter::{Cursor, into_ok};
use crate::sequence::stream::materialized::Materialized;

pub(crate) type LiftedStream<O, F> = Map<O, fn(<O as Stream>::Item) -> Result<<O as Stream>::Item, F>>;

pub(crate) fn lift<O, F>(outer: O) -> LiftedStream<O, F>
where
    O: Stream,
{
    outer.map(Ok as fn(O::Item) -> Result<O::Item, F>)
}

pin_project! {
    /// Pairs every inner element with its key.
    #[must_use = "streams do nothing unless polled"]
    pub struct KeyedStream<S, KeySelector> {
        #[pin]
        inner: S,
        key_selector: KeySelector,
    }
}

impl<S, KeySelector> KeyedStream<S, KeySelector> {
    pub(crate) const fn new(inner: S, key_selector: KeySelector) -> Self {
        Self { inner, key_selector }
    }
}

impl<S, K, KeySelector> Stream for KeyedStream<S, KeySelector>
where
    S: Stream,
    KeySelector: FnMut(&S::Item) -> K,
{
    type Item = (K, S::Item);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let item = ready!(this.inner.poll_next(cx));
        Poll::Ready(item.map(|item| ((this.key_selector)(&item), item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

type LookupOf<J, K, InnerKey> = Materialized<KeyedStream<J, InnerKey>, Lookup<K, <J as Stream>::Item>>;

pin_project! {
    /// Group join over a `Result` outer stream.
    #[must_use = "streams do nothing unless polled"]
    pub struct GroupJoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
    where
        J: Stream,
    {
        #[pin]
        outer: O,
        #[pin]
        lookup: LookupOf<J, K, InnerKey>,
        held: Option<T>,
        outer_key: OuterKey,
        selector: Selector,
    }
}

impl<O, J, K, OuterKey, InnerKey, Selector, T> GroupJoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
where
    J: Stream,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&J::Item) -> K,
{
    pub(crate) fn new(outer: O, inner: J, outer_key: OuterKey, inner_key: InnerKey, selector: Selector) -> Self {
        Self {
            outer,
            lookup: Materialized::new(KeyedStream::new(inner, inner_key)),
            held: None,
            outer_key,
            selector,
        }
    }
}

impl<O, J, K, OuterKey, InnerKey, Selector, T, F, R> Stream
    for GroupJoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
where
    O: Stream<Item = Result<T, F>>,
    J: Stream,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&T) -> K,
    InnerKey: FnMut(&J::Item) -> K,
    Selector: FnMut(T, &[J::Item]) -> R,
{
    type Item = Result<R, F>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let outer = match this.held.take() {
            Some(outer) => outer,
            None => match ready!(this.outer.as_mut().poll_next(cx)) {
                Some(Ok(outer)) => outer,
                Some(Err(failure)) => return Poll::Ready(Some(Err(failure))),
                None => return Poll::Ready(None),
            },
        };
        let lookup = match this.lookup.as_mut().poll_force(cx) {
            Poll::Ready(lookup) => lookup,
            Poll::Pending => {
                *this.held = Some(outer);
                return Poll::Pending;
            }
        };
        let key = (this.outer_key)(&outer);
        Poll::Ready(Some(Ok((this.selector)(outer, lookup.get(&key)))))
    }
}

pin_project! {
    /// Inner equality join over a `Result` outer stream.
    #[must_use = "streams do nothing unless polled"]
    pub struct JoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
    where
        J: Stream,
    {
        #[pin]
        outer: O,
        #[pin]
        lookup: LookupOf<J, K, InnerKey>,
        held: Option<T>,
        cursor: Option<Cursor<T>>,
        outer_key: OuterKey,
        selector: Selector,
    }
}

impl<O, J, K, OuterKey, InnerKey, Selector, T> JoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
where
    J: Stream,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&J::Item) -> K,
{
    pub(crate) fn new(outer: O, inner: J, outer_key: OuterKey, inner_key: InnerKey, selector: Selector) -> Self {
        Self {
            outer,
            lookup: Materialized::new(KeyedStream::new(inner, inner_key)),
            held: None,
            cursor: None,
            outer_key,
            selector,
        }
    }
}

impl<O, J, K, OuterKey, InnerKey, Selector, T, F, R> Stream for JoinOkStream<O, J, K, OuterKey, InnerKey, Selector, T>
where
    O: Stream<Item = Result<T, F>>,
    J: Stream,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&T) -> K,
    InnerKey: FnMut(&J::Item) -> K,
    Selector: FnMut(&T, &J::Item) -> R,
{
    type Item = Result<R, F>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(cursor) = this.cursor.as_mut() {
                let lookup = ready!(this.lookup.as_mut().poll_force(cx));
                if let Some(inner) = lookup.group_at(cursor.group).get(cursor.next) {
                    cursor.next += 1;
                    return Poll::Ready(Some(Ok((this.selector)(&cursor.outer, inner))));
                }
                *this.cursor = None;
            }

            let outer = match this.held.take() {
                Some(outer) => outer,
                None => match ready!(this.outer.as_mut().poll_next(cx)) {
                    Some(Ok(outer)) => outer,
                    Some(Err(failure)) => return Poll::Ready(Some(Err(failure))),
                    None => return Poll::Ready(None),
                },
            };
            let lookup = match this.lookup.as_mut().poll_force(cx) {
                Poll::Ready(lookup) => lookup,
                Poll::Pending => {
                    *this.held = Some(outer);
                    return Poll::Pending;
                }
            };
            let key = (this.outer_key)(&outer);
            if let Some(group) = lookup.position(&key) {
                *this.cursor = Some(Cursor {
                    outer,
                    group,
                    next: 0,
                });
            }
        }
    }
}

pin_project! {
    /// Unwraps the items of a join whose outer side cannot fail.
    #[must_use = "streams do nothing unless polled"]
    pub struct Infallibly<S> {
        #[pin]
        engine: S,
    }
}

impl<S> Infallibly<S> {
    pub(crate) const fn new(engine: S) -> Self {
        Self { engine }
    }
}

impl<S, R> Stream for Infallibly<S>
where
    S: Stream<Item = Result<R, Infallible>>,
{
    type Item = R;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<R>> {
        self.project().engine.poll_next(cx).map(|item| item.map(into_ok))
    }
}

/// Group join over a plain outer stream.
pub type GroupJoinStream<O, J, K, OuterKey, InnerKey, Selector> = Infallibly<
    GroupJoinOkStream<LiftedStream<O, Infallible>, J, K, OuterKey, InnerKey, Selector, <O as Stream>::Item>,
>;

/// Inner equality join over a plain outer stream.
pub type JoinStream<O, J, K, OuterKey, InnerKey, Selector> =
    Infallibly<JoinOkStream<LiftedStream<O, Infallible>, J, K, OuterKey, InnerKey, Selector, <O as Stream>::Item>>;
