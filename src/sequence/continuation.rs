//! The continuation state machine every lazy combinator is built from.
//!
//! A [`ContinuationIter`] owns an upstream iterator and a continuation. On
//! each pull it hands the next upstream element, together with its
//! [`Position`] (index and current [`IteratorState`]), to the continuation,
//! which answers with a [`Continuation`]:
//!
//! | answer      | effect                                             |
//! |-------------|----------------------------------------------------|
//! | `Take(v)`   | emit `v`, state becomes `Take`                     |
//! | `Start(v)`  | emit `v`, state becomes `Start`                    |
//! | `Skip`      | discard, state becomes `Skip`, pull again          |
//! | `Stop`      | drop the upstream, state becomes `Stop`, end       |
//!
//! Upstream exhaustion also moves to `Stop`. `Stop` is terminal: further
//! pulls return `None` without touching anything.
//!
//! `take_while` and `skip_while` are the two continuations shipped here; any
//! `FnMut(Item, Position) -> Continuation<T>` closure is a continuation too.

use std::iter::FusedIterator;

/// The state of a continuation-driven iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IteratorState {
    /// No element has been decided yet.
    #[default]
    Pending,
    /// The last element was taken.
    Take,
    /// The last element was skipped.
    Skip,
    /// Iteration has ended; terminal.
    Stop,
    /// The last element started an unconditional run.
    Start,
}

/// A continuation's decision about one upstream element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuation<T> {
    /// Emit the value and continue.
    Take(T),
    /// Discard the element and continue.
    Skip,
    /// End iteration without emitting.
    Stop,
    /// Emit the value and enter the `Start` state.
    Start(T),
}

impl<T> Continuation<T> {
    /// The state the iterator moves to after this decision.
    #[inline]
    pub const fn state(&self) -> IteratorState {
        match self {
            Self::Take(_) => IteratorState::Take,
            Self::Skip => IteratorState::Skip,
            Self::Stop => IteratorState::Stop,
            Self::Start(_) => IteratorState::Start,
        }
    }

    /// Transforms the emitted value, keeping the decision.
    #[inline]
    pub fn map<U, Map>(self, map: Map) -> Continuation<U>
    where
        Map: FnOnce(T) -> U,
    {
        match self {
            Self::Take(value) => Continuation::Take(map(value)),
            Self::Skip => Continuation::Skip,
            Self::Stop => Continuation::Stop,
            Self::Start(value) => Continuation::Start(map(value)),
        }
    }
}

/// Where an element sits: its upstream index and the state before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based index of the element in the upstream.
    pub index: usize,
    /// The iterator state before this element is decided.
    pub state: IteratorState,
}

/// A synchronous continuation.
///
/// Implemented for every `FnMut(Item, Position) -> Continuation<T>`.
pub trait Continue<Item> {
    /// The type of emitted values.
    type Output;

    /// Decides what to do with `item`.
    fn resume(&mut self, item: Item, position: Position) -> Continuation<Self::Output>;
}

impl<Item, T, Step> Continue<Item> for Step
where
    Step: FnMut(Item, Position) -> Continuation<T>,
{
    type Output = T;

    #[inline]
    fn resume(&mut self, item: Item, position: Position) -> Continuation<T> {
        self(item, position)
    }
}

/// Continuation taking elements while an indexed predicate holds.
#[derive(Debug, Clone)]
pub struct TakeWhileStep<Predicate> {
    predicate: Predicate,
}

impl<Predicate> TakeWhileStep<Predicate> {
    /// Wraps `predicate`.
    pub const fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }
}

impl<Item, Predicate> Continue<Item> for TakeWhileStep<Predicate>
where
    Predicate: FnMut(&Item, usize) -> bool,
{
    type Output = Item;

    #[inline]
    fn resume(&mut self, item: Item, position: Position) -> Continuation<Item> {
        if (self.predicate)(&item, position.index) {
            Continuation::Take(item)
        } else {
            Continuation::Stop
        }
    }
}

/// Continuation skipping elements while an indexed predicate holds.
///
/// Once an element fails the predicate the state is `Start` and the predicate
/// is never consulted again.
#[derive(Debug, Clone)]
pub struct SkipWhileStep<Predicate> {
    predicate: Predicate,
}

impl<Predicate> SkipWhileStep<Predicate> {
    /// Wraps `predicate`.
    pub const fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }
}

impl<Item, Predicate> Continue<Item> for SkipWhileStep<Predicate>
where
    Predicate: FnMut(&Item, usize) -> bool,
{
    type Output = Item;

    #[inline]
    fn resume(&mut self, item: Item, position: Position) -> Continuation<Item> {
        if position.state == IteratorState::Start || !(self.predicate)(&item, position.index) {
            Continuation::Start(item)
        } else {
            Continuation::Skip
        }
    }
}

/// A lazy iterator driven by a [`Continue`] implementation.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ContinuationIter<I, C> {
    upstream: Option<I>,
    continuation: C,
    state: IteratorState,
    index: usize,
}

impl<I, C> ContinuationIter<I, C> {
    /// Creates an iterator in the `Pending` state.
    pub const fn new(upstream: I, continuation: C) -> Self {
        Self::with_state(upstream, IteratorState::Pending, continuation)
    }

    /// Creates an iterator starting in `state`.
    ///
    /// Starting in `Stop` yields nothing and never pulls the upstream.
    pub const fn with_state(upstream: I, state: IteratorState, continuation: C) -> Self {
        Self {
            upstream: Some(upstream),
            continuation,
            state,
            index: 0,
        }
    }

    /// The current state.
    #[inline]
    pub const fn state(&self) -> IteratorState {
        self.state
    }

    fn finish(&mut self) {
        self.state = IteratorState::Stop;
        self.upstream = None;
    }
}

impl<I, C> Iterator for ContinuationIter<I, C>
where
    I: Iterator,
    C: Continue<I::Item>,
{
    type Item = C::Output;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == IteratorState::Stop {
                return None;
            }
            let Some(item) = self.upstream.as_mut().and_then(Iterator::next) else {
                self.finish();
                return None;
            };
            let position = Position {
                index: self.index,
                state: self.state,
            };
            self.index += 1;

            match self.continuation.resume(item, position) {
                Continuation::Take(value) => {
                    self.state = IteratorState::Take;
                    return Some(value);
                }
                Continuation::Start(value) => {
                    self.state = IteratorState::Start;
                    return Some(value);
                }
                Continuation::Skip => self.state = IteratorState::Skip,
                Continuation::Stop => {
                    self.finish();
                    return None;
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

impl<I, C> FusedIterator for ContinuationIter<I, C>
where
    I: Iterator,
    C: Continue<I::Item>,
{
}

/// Iterator returned by [`take_while_indexed`](crate::sequence::SequenceExt::take_while_indexed).
pub type TakeWhile<I, Predicate> = ContinuationIter<I, TakeWhileStep<Predicate>>;

/// Iterator returned by [`skip_while_indexed`](crate::sequence::SequenceExt::skip_while_indexed).
pub type SkipWhile<I, Predicate> = ContinuationIter<I, SkipWhileStep<Predicate>>;
