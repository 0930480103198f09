//! Set difference and keyed intersection over streams.
//!
//! The second source is a stream of keys, collected into a set when the first
//! element of `first` arrives. A synchronous second source is passed through
//! [`SequenceExt::into_stream`](crate::sequence::SequenceExt::into_stream).

use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

use super::materialized::Materialized;
use crate::hash::HashSet;

pin_project! {
    /// Elements of `first` whose key is neither in `second` nor already yielded.
    #[must_use = "streams do nothing unless polled"]
    pub struct ExceptByStream<S, S2, K, KeySelector>
    where
        S: Stream,
    {
        #[pin]
        first: S,
        #[pin]
        excluded: Materialized<S2, HashSet<K>>,
        held: Option<S::Item>,
        key_selector: KeySelector,
        done: bool,
    }
}

impl<S, S2, K, KeySelector> ExceptByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
{
    pub(crate) fn new(first: S, second: S2, key_selector: KeySelector) -> Self {
        Self {
            first,
            excluded: Materialized::new(second),
            held: None,
            key_selector,
            done: false,
        }
    }
}

impl<S, S2, K, KeySelector> FusedStream for ExceptByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&S::Item) -> K,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<S, S2, K, KeySelector> Stream for ExceptByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&S::Item) -> K,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }
        loop {
            let item = match this.held.take() {
                Some(item) => item,
                None => match ready!(this.first.as_mut().poll_next(cx)) {
                    Some(item) => item,
                    None => {
                        *this.done = true;
                        return Poll::Ready(None);
                    }
                },
            };
            let excluded = match this.excluded.as_mut().poll_force(cx) {
                Poll::Ready(excluded) => excluded,
                Poll::Pending => {
                    *this.held = Some(item);
                    return Poll::Pending;
                }
            };
            if excluded.insert((this.key_selector)(&item)) {
                return Poll::Ready(Some(item));
            }
        }
    }
}

/// Stream returned by [`StreamSequenceExt::except`](super::StreamSequenceExt::except).
pub type ExceptStream<S, S2> =
    ExceptByStream<S, S2, <S as Stream>::Item, fn(&<S as Stream>::Item) -> <S as Stream>::Item>;

pin_project! {
    /// Elements of `first` whose key removes a key from `second`.
    #[must_use = "streams do nothing unless polled"]
    pub struct IntersectByStream<S, S2, K, KeySelector>
    where
        S: Stream,
    {
        #[pin]
        first: S,
        #[pin]
        remaining: Materialized<S2, HashSet<K>>,
        held: Option<S::Item>,
        key_selector: KeySelector,
        done: bool,
    }
}

impl<S, S2, K, KeySelector> IntersectByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
{
    pub(crate) fn new(first: S, second: S2, key_selector: KeySelector) -> Self {
        Self {
            first,
            remaining: Materialized::new(second),
            held: None,
            key_selector,
            done: false,
        }
    }
}

impl<S, S2, K, KeySelector> FusedStream for IntersectByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&S::Item) -> K,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<S, S2, K, KeySelector> Stream for IntersectByStream<S, S2, K, KeySelector>
where
    S: Stream,
    S2: Stream<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&S::Item) -> K,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }
        loop {
            let item = match this.held.take() {
                Some(item) => item,
                None => match ready!(this.first.as_mut().poll_next(cx)) {
                    Some(item) => item,
                    None => {
                        *this.done = true;
                        return Poll::Ready(None);
                    }
                },
            };
            let remaining = match this.remaining.as_mut().poll_force(cx) {
                Poll::Ready(remaining) => remaining,
                Poll::Pending => {
                    *this.held = Some(item);
                    return Poll::Pending;
                }
            };
            if remaining.remove(&(this.key_selector)(&item)) {
                return Poll::Ready(Some(item));
            }
        }
    }
}
