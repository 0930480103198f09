//! The continuation state machine over `Stream`.
//!
//! [`ContinuationStream`] is the asynchronous twin of
//! [`ContinuationIter`](crate::sequence::ContinuationIter): the same states and
//! the same transitions, but each decision is a future. Synchronous
//! continuations are lifted with [`Synchronous`], which answers with
//! `futures::future::Ready`.
//!
//! While a decision is in flight the stream holds it and polls it again on
//! the next wake-up; the upstream is not pulled until the decision resolves.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::future::{self, Ready};
use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

use crate::sequence::{Continuation, Continue, IteratorState, Position, SkipWhileStep, TakeWhileStep};

/// An asynchronous continuation.
///
/// Implemented for every `FnMut(Item, Position) -> impl Future<Output = Continuation<T>>`.
pub trait ContinueAsync<Item> {
    /// The type of emitted values.
    type Output;
    /// The pending decision.
    type Future: Future<Output = Continuation<Self::Output>>;

    /// Starts deciding what to do with `item`.
    fn resume(&mut self, item: Item, position: Position) -> Self::Future;
}

impl<Item, T, Step, Decision> ContinueAsync<Item> for Step
where
    Step: FnMut(Item, Position) -> Decision,
    Decision: Future<Output = Continuation<T>>,
{
    type Output = T;
    type Future = Decision;

    #[inline]
    fn resume(&mut self, item: Item, position: Position) -> Decision {
        self(item, position)
    }
}

/// Lifts a synchronous [`Continue`] into an always-ready [`ContinueAsync`].
#[derive(Debug, Clone)]
pub struct Synchronous<C>(pub C);

impl<Item, C> ContinueAsync<Item> for Synchronous<C>
where
    C: Continue<Item>,
{
    type Output = C::Output;
    type Future = Ready<Continuation<C::Output>>;

    #[inline]
    fn resume(&mut self, item: Item, position: Position) -> Self::Future {
        future::ready(self.0.resume(item, position))
    }
}

pin_project! {
    /// A lazy stream driven by a [`ContinueAsync`] implementation.
    #[must_use = "streams do nothing unless polled"]
    pub struct ContinuationStream<S, C, Decision> {
        #[pin]
        upstream: Option<S>,
        #[pin]
        decision: Option<Decision>,
        continuation: C,
        state: IteratorState,
        index: usize,
    }
}

impl<S, C, Decision> ContinuationStream<S, C, Decision> {
    /// Creates a stream in the `Pending` state.
    pub const fn new(upstream: S, continuation: C) -> Self {
        Self {
            upstream: Some(upstream),
            decision: None,
            continuation,
            state: IteratorState::Pending,
            index: 0,
        }
    }

    /// The current state.
    pub const fn state(&self) -> IteratorState {
        self.state
    }
}

impl<S, C, Decision> Stream for ContinuationStream<S, C, Decision>
where
    S: Stream,
    C: ContinueAsync<S::Item, Future = Decision>,
    Decision: Future<Output = Continuation<C::Output>>,
{
    type Item = C::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(decision) = this.decision.as_mut().as_pin_mut() {
                let continuation = ready!(decision.poll(cx));
                this.decision.set(None);
                match continuation {
                    Continuation::Take(value) => {
                        *this.state = IteratorState::Take;
                        return Poll::Ready(Some(value));
                    }
                    Continuation::Start(value) => {
                        *this.state = IteratorState::Start;
                        return Poll::Ready(Some(value));
                    }
                    Continuation::Skip => *this.state = IteratorState::Skip,
                    Continuation::Stop => {
                        *this.state = IteratorState::Stop;
                        this.upstream.set(None);
                        return Poll::Ready(None);
                    }
                }
            }

            if *this.state == IteratorState::Stop {
                return Poll::Ready(None);
            }
            let Some(upstream) = this.upstream.as_mut().as_pin_mut() else {
                return Poll::Ready(None);
            };
            match ready!(upstream.poll_next(cx)) {
                Some(item) => {
                    let position = Position {
                        index: *this.index,
                        state: *this.state,
                    };
                    *this.index += 1;
                    this.decision.set(Some(this.continuation.resume(item, position)));
                }
                None => {
                    *this.state = IteratorState::Stop;
                    this.upstream.set(None);
                    return Poll::Ready(None);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.upstream {
            Some(upstream) if self.state != IteratorState::Stop => (0, upstream.size_hint().1),
            _ => (0, Some(0)),
        }
    }
}

impl<S, C, Decision> FusedStream for ContinuationStream<S, C, Decision>
where
    S: Stream,
    C: ContinueAsync<S::Item, Future = Decision>,
    Decision: Future<Output = Continuation<C::Output>>,
{
    fn is_terminated(&self) -> bool {
        self.state == IteratorState::Stop
    }
}

// =============================================================================
// Asynchronous predicates
// =============================================================================

/// Continuation taking elements while an asynchronous indexed predicate holds.
pub struct TakeWhileAsyncStep<Predicate, Test> {
    predicate: Predicate,
    _test: PhantomData<fn() -> Test>,
}

impl<Predicate, Test> TakeWhileAsyncStep<Predicate, Test> {
    /// Wraps `predicate`.
    pub const fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            _test: PhantomData,
        }
    }
}

impl<Item, Predicate, Test> ContinueAsync<Item> for TakeWhileAsyncStep<Predicate, Test>
where
    Predicate: FnMut(&Item, usize) -> Test,
    Test: Future<Output = bool>,
{
    type Output = Item;
    type Future = TakeWhileDecision<Test, Item>;

    fn resume(&mut self, item: Item, position: Position) -> Self::Future {
        TakeWhileDecision {
            test: (self.predicate)(&item, position.index),
            item: Some(item),
        }
    }
}

pin_project! {
    /// Pending decision of [`TakeWhileAsyncStep`].
    #[must_use = "futures do nothing unless polled"]
    pub struct TakeWhileDecision<Test, T> {
        #[pin]
        test: Test,
        item: Option<T>,
    }
}

impl<Test, T> Future for TakeWhileDecision<Test, T>
where
    Test: Future<Output = bool>,
{
    type Output = Continuation<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let keep = ready!(this.test.poll(cx));
        Poll::Ready(match this.item.take() {
            Some(item) if keep => Continuation::Take(item),
            _ => Continuation::Stop,
        })
    }
}

/// Continuation skipping elements while an asynchronous indexed predicate
/// holds. In the `Start` state the predicate is not invoked.
pub struct SkipWhileAsyncStep<Predicate, Test> {
    predicate: Predicate,
    _test: PhantomData<fn() -> Test>,
}

impl<Predicate, Test> SkipWhileAsyncStep<Predicate, Test> {
    /// Wraps `predicate`.
    pub const fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            _test: PhantomData,
        }
    }
}

impl<Item, Predicate, Test> ContinueAsync<Item> for SkipWhileAsyncStep<Predicate, Test>
where
    Predicate: FnMut(&Item, usize) -> Test,
    Test: Future<Output = bool>,
{
    type Output = Item;
    type Future = SkipWhileDecision<Test, Item>;

    fn resume(&mut self, item: Item, position: Position) -> Self::Future {
        let test = (position.state != IteratorState::Start).then(|| (self.predicate)(&item, position.index));
        SkipWhileDecision {
            test,
            item: Some(item),
        }
    }
}

pin_project! {
    /// Pending decision of [`SkipWhileAsyncStep`].
    #[must_use = "futures do nothing unless polled"]
    pub struct SkipWhileDecision<Test, T> {
        #[pin]
        test: Option<Test>,
        item: Option<T>,
    }
}

impl<Test, T> Future for SkipWhileDecision<Test, T>
where
    Test: Future<Output = bool>,
{
    type Output = Continuation<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let skip = match this.test.as_pin_mut() {
            Some(test) => ready!(test.poll(cx)),
            None => false,
        };
        Poll::Ready(match this.item.take() {
            Some(item) if !skip => Continuation::Start(item),
            Some(_) => Continuation::Skip,
            None => Continuation::Stop,
        })
    }
}

/// Stream returned by [`StreamSequenceExt::take_while_indexed`](super::StreamSequenceExt::take_while_indexed).
pub type TakeWhileStream<S, Predicate> = ContinuationStream<
    S,
    Synchronous<TakeWhileStep<Predicate>>,
    Ready<Continuation<<S as Stream>::Item>>,
>;

/// Stream returned by [`StreamSequenceExt::skip_while_indexed`](super::StreamSequenceExt::skip_while_indexed).
pub type SkipWhileStream<S, Predicate> = ContinuationStream<
    S,
    Synchronous<SkipWhileStep<Predicate>>,
    Ready<Continuation<<S as Stream>::Item>>,
>;

/// Stream returned by [`StreamSequenceExt::take_while_async`](super::StreamSequenceExt::take_while_async).
pub type TakeWhileAsync<S, Predicate, Test> = ContinuationStream<
    S,
    TakeWhileAsyncStep<Predicate, Test>,
    TakeWhileDecision<Test, <S as Stream>::Item>,
>;

/// Stream returned by [`StreamSequenceExt::skip_while_async`](super::StreamSequenceExt::skip_while_async).
pub type SkipWhileAsync<S, Predicate, Test> = ContinuationStream<
    S,
    SkipWhileAsyncStep<Predicate, Test>,
    SkipWhileDecision<Test, <S as Stream>::Item>,
>;
