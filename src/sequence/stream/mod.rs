//! Lazy combinators for `futures::Stream`.
//!
//! [`StreamSequenceExt`] and [`ResultStreamExt`] mirror
//! [`SequenceExt`](crate::sequence::SequenceExt) and
//! [`ResultSequenceExt`](crate::sequence::ResultSequenceExt). Predicates and
//! continuations come in a synchronous flavour and an asynchronous one that
//! returns a future. Cancellation is dropping the stream: every adapter owns
//! its upstream and releases it on drop.
//!
//! # Examples
//!
//! ```rust
//! use futures::StreamExt;
//! use futures::executor::block_on;
//! use futures::future;
//! use railyard::sequence::stream::StreamSequenceExt;
//!
//! let numbers = futures::stream::iter(vec![1, 2, 3, 4]);
//! let prefix: Vec<i32> = block_on(numbers.take_while_async(|value, _| future::ready(*value < 3)).collect());
//! assert_eq!(prefix, vec![1, 2]);
//! ```

mod append;
mod continuation;
mod except;
pub(crate) mod materialized;
mod partition;

pub use append::AppendStream;
pub use continuation::{
    ContinuationStream, ContinueAsync, SkipWhileAsync, SkipWhileAsyncStep, SkipWhileDecision, SkipWhileStream,
    Synchronous, TakeWhileAsync, TakeWhileAsyncStep, TakeWhileDecision, TakeWhileStream,
};
pub use except::{ExceptByStream, ExceptStream, IntersectByStream};
pub use partition::StreamPartitionHalf;

pub use crate::join::stream::{GroupJoinStream, Infallibly, JoinStream};

use std::future::Future;
use std::hash::Hash;

use futures::future::{self, Either, Ready};
use futures::stream::{self, Stream, StreamExt};

use super::group_by;
use crate::join::Lookup;
use crate::join::stream::{GroupJoinOkStream, JoinOkStream, lift};
use crate::sequence::{Continuation, Partition, Position, SkipWhileStep, TakeWhileStep};

/// Lazy combinators for every `Stream`.
pub trait StreamSequenceExt: Stream + Sized {
    /// Takes elements while the indexed predicate holds, then stops.
    fn take_while_indexed<Predicate>(self, predicate: Predicate) -> TakeWhileStream<Self, Predicate>
    where
        Predicate: FnMut(&Self::Item, usize) -> bool,
    {
        ContinuationStream::new(self, Synchronous(TakeWhileStep::new(predicate)))
    }

    /// Skips elements while the indexed predicate holds.
    fn skip_while_indexed<Predicate>(self, predicate: Predicate) -> SkipWhileStream<Self, Predicate>
    where
        Predicate: FnMut(&Self::Item, usize) -> bool,
    {
        ContinuationStream::new(self, Synchronous(SkipWhileStep::new(predicate)))
    }

    /// Takes elements while the asynchronous indexed predicate holds.
    ///
    /// The next element is not pulled until the pending predicate resolves.
    fn take_while_async<Predicate, Test>(self, predicate: Predicate) -> TakeWhileAsync<Self, Predicate, Test>
    where
        Predicate: FnMut(&Self::Item, usize) -> Test,
        Test: Future<Output = bool>,
    {
        ContinuationStream::new(self, TakeWhileAsyncStep::new(predicate))
    }

    /// Skips elements while the asynchronous indexed predicate holds; once it
    /// fails the predicate is no longer invoked.
    fn skip_while_async<Predicate, Test>(self, predicate: Predicate) -> SkipWhileAsync<Self, Predicate, Test>
    where
        Predicate: FnMut(&Self::Item, usize) -> Test,
        Test: Future<Output = bool>,
    {
        ContinuationStream::new(self, SkipWhileAsyncStep::new(predicate))
    }

    /// Drives the stream with a synchronous continuation.
    fn with_continuation<T, Step>(
        self,
        continuation: Step,
    ) -> ContinuationStream<Self, Synchronous<Step>, Ready<Continuation<T>>>
    where
        Step: FnMut(Self::Item, Position) -> Continuation<T>,
    {
        ContinuationStream::new(self, Synchronous(continuation))
    }

    /// Drives the stream with an asynchronous continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futures::StreamExt;
    /// use futures::executor::block_on;
    /// use railyard::sequence::Continuation;
    /// use railyard::sequence::stream::StreamSequenceExt;
    ///
    /// let labels: Vec<String> = block_on(
    ///     futures::stream::iter(vec![1, 2, 3])
    ///         .with_async_continuation(|value: i32, position| async move {
    ///             if value == 3 {
    ///                 Continuation::Stop
    ///             } else {
    ///                 Continuation::Take(format!("{}:{value}", position.index))
    ///             }
    ///         })
    ///         .collect(),
    /// );
    /// assert_eq!(labels, vec!["0:1", "1:2"]);
    /// ```
    fn with_async_continuation<T, Step, Decision>(
        self,
        continuation: Step,
    ) -> ContinuationStream<Self, Step, Decision>
    where
        Step: FnMut(Self::Item, Position) -> Decision,
        Decision: Future<Output = Continuation<T>>,
    {
        ContinuationStream::new(self, continuation)
    }

    /// Yields the elements not contained in `second`, each at most once.
    fn except<S2>(self, second: S2) -> ExceptStream<Self, S2>
    where
        S2: Stream<Item = Self::Item>,
        Self::Item: Eq + Hash + Clone,
    {
        ExceptByStream::new(self, second, <Self::Item as Clone>::clone as fn(&Self::Item) -> Self::Item)
    }

    /// Yields the elements whose key is not in `second_keys`, each key at
    /// most once.
    fn except_by_key<S2, K, KeySelector>(
        self,
        second_keys: S2,
        key_selector: KeySelector,
    ) -> ExceptByStream<Self, S2, K, KeySelector>
    where
        S2: Stream<Item = K>,
        K: Eq + Hash,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        ExceptByStream::new(self, second_keys, key_selector)
    }

    /// Yields the elements whose key removes a key from `second_keys`.
    fn intersect_by<S2, K, KeySelector>(
        self,
        second_keys: S2,
        key_selector: KeySelector,
    ) -> IntersectByStream<Self, S2, K, KeySelector>
    where
        S2: Stream<Item = K>,
        K: Eq + Hash,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        IntersectByStream::new(self, second_keys, key_selector)
    }

    /// Yields every element, then `element`.
    fn append(self, element: Self::Item) -> AppendStream<Self, Self::Item> {
        AppendStream::new(self, element)
    }

    /// Groups every element by key.
    fn group_by<K, KeySelector>(self, key_selector: KeySelector) -> impl Future<Output = Lookup<K, Self::Item>>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        self.group_by_element(key_selector, |item| item)
    }

    /// Groups projected elements by key.
    fn group_by_element<K, V, KeySelector, ElementSelector>(
        self,
        mut key_selector: KeySelector,
        mut element_selector: ElementSelector,
    ) -> impl Future<Output = Lookup<K, V>>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
        ElementSelector: FnMut(Self::Item) -> V,
    {
        StreamExt::fold(self, Lookup::new(), move |mut lookup, item| {
            lookup.push(key_selector(&item), element_selector(item));
            future::ready(lookup)
        })
    }

    /// Groups projected elements by key and reduces each group.
    fn group_by_result<K, V, R, KeySelector, ElementSelector, ResultSelector>(
        self,
        key_selector: KeySelector,
        element_selector: ElementSelector,
        result_selector: ResultSelector,
    ) -> impl Future<Output = Vec<R>>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
        ElementSelector: FnMut(Self::Item) -> V,
        ResultSelector: FnMut(K, Vec<V>) -> R,
    {
        let grouped = self.group_by_element(key_selector, element_selector);
        async move { group_by::project(grouped.await, result_selector) }
    }

    /// Splits into two halves with a synchronous predicate.
    fn partition_lazy<Predicate>(
        self,
        mut predicate: Predicate,
    ) -> Partition<impl Stream<Item = Self::Item>, impl Stream<Item = Self::Item>>
    where
        Predicate: FnMut(&Self::Item) -> bool,
    {
        partition::partition_async(self, move |item: &Self::Item| future::ready(predicate(item)))
    }

    /// Splits into two halves with an asynchronous predicate.
    ///
    /// The halves may be polled in any order, from different tasks; each
    /// element is tested once and routed to exactly one half.
    fn partition_async<Predicate, Test>(
        self,
        predicate: Predicate,
    ) -> Partition<StreamPartitionHalf<Self, Predicate, Test>, StreamPartitionHalf<Self, Predicate, Test>>
    where
        Predicate: FnMut(&Self::Item) -> Test,
        Test: Future<Output = bool>,
    {
        partition::partition_async(self, predicate)
    }

    /// Splits into `(non_matches, matches)`.
    fn pick_into<Predicate>(
        self,
        predicate: Predicate,
    ) -> (impl Stream<Item = Self::Item>, impl Stream<Item = Self::Item>)
    where
        Predicate: FnMut(&Self::Item) -> bool,
    {
        let Partition { matches, non_matches } = self.partition_lazy(predicate);
        (non_matches, matches)
    }

    /// Splits into `(non_matches, matches)` with an asynchronous predicate.
    fn pick_into_async<Predicate, Test>(
        self,
        predicate: Predicate,
    ) -> (StreamPartitionHalf<Self, Predicate, Test>, StreamPartitionHalf<Self, Predicate, Test>)
    where
        Predicate: FnMut(&Self::Item) -> Test,
        Test: Future<Output = bool>,
    {
        let Partition { matches, non_matches } = self.partition_async(predicate);
        (non_matches, matches)
    }

    /// Maps each element to `Ok(element)` or the failure `validate` returns.
    fn where_valid<F, Validate>(self, mut validate: Validate) -> impl Stream<Item = Result<Self::Item, F>>
    where
        Validate: FnMut(&Self::Item) -> Result<(), F>,
    {
        self.map(move |item| validate(&item).map(|()| item))
    }

    /// Like [`where_valid`](Self::where_valid), awaiting each validation
    /// before the next element is pulled.
    fn where_valid_async<F, Validate, Test>(
        self,
        mut validate: Validate,
    ) -> impl Stream<Item = Result<Self::Item, F>>
    where
        Validate: FnMut(&Self::Item) -> Test,
        Test: Future<Output = Result<(), F>>,
    {
        self.then(move |item| {
            let test = validate(&item);
            async move { test.await.map(|()| item) }
        })
    }

    /// Maps each element to `Some(element)`, or `None` when `check` rejects it.
    fn where_present<Check>(self, mut check: Check) -> impl Stream<Item = Option<Self::Item>>
    where
        Check: FnMut(&Self::Item) -> Option<()>,
    {
        self.map(move |item| check(&item).map(|()| item))
    }

    /// Like [`where_present`](Self::where_present) with an asynchronous check.
    fn where_present_async<Check, Test>(self, mut check: Check) -> impl Stream<Item = Option<Self::Item>>
    where
        Check: FnMut(&Self::Item) -> Test,
        Test: Future<Output = Option<()>>,
    {
        self.then(move |item| {
            let test = check(&item);
            async move { test.await.map(|()| item) }
        })
    }

    /// Pairs every element with the group of `inner` elements sharing its key.
    ///
    /// `inner` is collected when the first element arrives.
    fn group_join<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> GroupJoinStream<Self, J, K, OuterKey, InnerKey, Selector>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(Self::Item, &[J::Item]) -> R,
    {
        Infallibly::new(GroupJoinOkStream::new(lift(self), inner, outer_key, inner_key, selector))
    }

    /// Yields one result per (element, matching `inner` element) pair.
    fn join<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> JoinStream<Self, J, K, OuterKey, InnerKey, Selector>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&Self::Item, &J::Item) -> R,
    {
        Infallibly::new(JoinOkStream::new(lift(self), inner, outer_key, inner_key, selector))
    }

    /// Group join against an inner stream that may have failed.
    ///
    /// A failed inner side yields exactly one failure and never polls this
    /// stream.
    fn try_group_join<J, F, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> impl Stream<Item = Result<R, F>>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(Self::Item, &[J::Item]) -> R,
    {
        match inner {
            Ok(inner) => Either::Left(GroupJoinOkStream::new(
                lift::<Self, F>(self),
                inner,
                outer_key,
                inner_key,
                selector,
            )),
            Err(failure) => Either::Right(stream::once(future::ready(Err(failure)))),
        }
    }

    /// Join against an inner stream that may have failed.
    fn try_join<J, F, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> impl Stream<Item = Result<R, F>>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&Self::Item, &J::Item) -> R,
    {
        match inner {
            Ok(inner) => Either::Left(JoinOkStream::new(
                lift::<Self, F>(self),
                inner,
                outer_key,
                inner_key,
                selector,
            )),
            Err(failure) => Either::Right(stream::once(future::ready(Err(failure)))),
        }
    }
}

impl<S: Stream> StreamSequenceExt for S {}

/// Joins for streams whose elements are `Result`s.
///
/// Outer failures pass through in place; only successes are joined.
pub trait ResultStreamExt<T, F>: Stream<Item = Result<T, F>> + Sized {
    /// Group join of the successes; failures pass through.
    fn group_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> GroupJoinOkStream<Self, J, K, OuterKey, InnerKey, Selector, T>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(T, &[J::Item]) -> R,
    {
        GroupJoinOkStream::new(self, inner, outer_key, inner_key, selector)
    }

    /// Join of the successes; failures pass through.
    fn join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> JoinOkStream<Self, J, K, OuterKey, InnerKey, Selector, T>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&T, &J::Item) -> R,
    {
        JoinOkStream::new(self, inner, outer_key, inner_key, selector)
    }

    /// Validates every success; failures pass through unvalidated.
    fn where_valid_ok<Validate>(self, mut validate: Validate) -> impl Stream<Item = Result<T, F>>
    where
        Validate: FnMut(&T) -> Result<(), F>,
    {
        self.map(move |item| item.and_then(|value| validate(&value).map(|()| value)))
    }

    /// Like [`where_valid_ok`](Self::where_valid_ok) with an asynchronous
    /// validation. Failures are forwarded without awaiting anything.
    fn where_valid_ok_async<Validate, Test>(self, mut validate: Validate) -> impl Stream<Item = Result<T, F>>
    where
        Validate: FnMut(&T) -> Test,
        Test: Future<Output = Result<(), F>>,
    {
        self.then(move |item| match item {
            Ok(value) => {
                let test = validate(&value);
                Either::Left(async move { test.await.map(|()| value) })
            }
            Err(failure) => Either::Right(future::ready(Err(failure))),
        })
    }

    /// Group join against an inner stream that may have failed.
    ///
    /// A failed inner side yields this stream's own failures, then the inner
    /// failure last.
    fn try_group_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> impl Stream<Item = Result<R, F>>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(T, &[J::Item]) -> R,
    {
        match inner {
            Ok(inner) => Either::Left(GroupJoinOkStream::new(self, inner, outer_key, inner_key, selector)),
            Err(failure) => Either::Right(outer_failures_then(self, failure)),
        }
    }

    /// Join against an inner stream that may have failed.
    fn try_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> impl Stream<Item = Result<R, F>>
    where
        J: Stream,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&T, &J::Item) -> R,
    {
        match inner {
            Ok(inner) => Either::Left(JoinOkStream::new(self, inner, outer_key, inner_key, selector)),
            Err(failure) => Either::Right(outer_failures_then(self, failure)),
        }
    }
}

impl<S, T, F> ResultStreamExt<T, F> for S where S: Stream<Item = Result<T, F>> {}

/// Validation for streams whose elements are `Option`s.
pub trait OptionStreamExt<T>: Stream<Item = Option<T>> + Sized {
    /// Checks every present value; `None` passes through unchecked.
    fn where_some<Check>(self, mut check: Check) -> impl Stream<Item = Option<T>>
    where
        Check: FnMut(&T) -> Option<()>,
    {
        self.map(move |item| item.and_then(|value| check(&value).map(|()| value)))
    }

    /// Like [`where_some`](Self::where_some) with an asynchronous check.
    fn where_some_async<Check, Test>(self, mut check: Check) -> impl Stream<Item = Option<T>>
    where
        Check: FnMut(&T) -> Test,
        Test: Future<Output = Option<()>>,
    {
        self.then(move |item| match item {
            Some(value) => {
                let test = check(&value);
                Either::Left(async move { test.await.map(|()| value) })
            }
            None => Either::Right(future::ready(None)),
        })
    }
}

impl<S, T> OptionStreamExt<T> for S where S: Stream<Item = Option<T>> {}

fn outer_failures_then<O, T, F, R>(outer: O, failure: F) -> impl Stream<Item = Result<R, F>>
where
    O: Stream<Item = Result<T, F>>,
{
    outer
        .filter_map(|item| future::ready(item.err().map(Err::<R, F>)))
        .chain(stream::once(future::ready(Err(failure))))
}
