//! Lazy sequence combinators.
//!
//! [`SequenceExt`] extends every `Iterator`; [`ResultSequenceExt`] extends
//! iterators of `Result`. Stream counterparts live in [`stream`] behind the
//! `async` feature.
//!
//! Every adapter is lazy: nothing is pulled until the adapter is, and
//! dropping an adapter drops everything it owns, including its upstream.
//! Operators that need a side structure (`except`, `intersect_by`, the joins)
//! build it exactly once, on the first pull.
//!
//! # Examples
//!
//! ```rust
//! use railyard::sequence::SequenceExt;
//!
//! let remaining: Vec<i32> = vec![1, 2, 3, 1].into_iter().skip_while_indexed(|value, _| *value < 3).collect();
//! assert_eq!(remaining, vec![3, 1]);
//!
//! let unique: Vec<i32> = vec![1, 2, 2, 3].into_iter().except(vec![2]).collect();
//! assert_eq!(unique, vec![1, 3]);
//!
//! let shouted: Vec<&str> = vec!["a", "b"].into_iter().append("!").collect();
//! assert_eq!(shouted, vec!["a", "b", "!"]);
//! ```

mod append;
mod continuation;
pub(crate) mod deferred;
mod except;
mod group_by;
mod partition;
mod validate;

#[cfg(feature = "async")]
pub mod stream;

pub use append::{Append, AppendState};
pub use continuation::{
    Continuation, ContinuationIter, Continue, IteratorState, Position, SkipWhile, SkipWhileStep, TakeWhile,
    TakeWhileStep,
};
pub use except::{Except, ExceptBy, IntersectBy};
pub use partition::{Partition, PartitionHalf, Side};
pub use validate::{WherePresent, WhereSome, WhereValid, WhereValidOk};

use std::hash::Hash;

use crate::join::iter::{GroupJoinOk, JoinOk, Lifted, lift};
use crate::join::{GroupJoin, Join, Lookup, TryJoin};

/// Takes elements while `predicate` holds, then stops.
///
/// The upstream is dropped as soon as the predicate first fails.
///
/// # Examples
///
/// ```rust
/// let prefix: Vec<i32> = railyard::sequence::take_while(vec![1, 2, 3, 4, 1], |value| *value < 3).collect();
/// assert_eq!(prefix, vec![1, 2]);
/// ```
pub fn take_while<I, Predicate>(
    source: I,
    mut predicate: Predicate,
) -> TakeWhile<I::IntoIter, impl FnMut(&I::Item, usize) -> bool>
where
    I: IntoIterator,
    Predicate: FnMut(&I::Item) -> bool,
{
    source.into_iter().take_while_indexed(move |item, _| predicate(item))
}

/// Skips elements while `predicate` holds, then yields everything.
///
/// # Examples
///
/// ```rust
/// let rest: Vec<i32> = railyard::sequence::skip_while(vec![1, 2, 3, 1], |value| *value < 3).collect();
/// assert_eq!(rest, vec![3, 1]);
/// ```
pub fn skip_while<I, Predicate>(
    source: I,
    mut predicate: Predicate,
) -> SkipWhile<I::IntoIter, impl FnMut(&I::Item, usize) -> bool>
where
    I: IntoIterator,
    Predicate: FnMut(&I::Item) -> bool,
{
    source.into_iter().skip_while_indexed(move |item, _| predicate(item))
}

/// Lazy combinators for every `Iterator`.
pub trait SequenceExt: Iterator + Sized {
    /// Takes elements while the indexed predicate holds, then stops.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::SequenceExt;
    ///
    /// let head: Vec<char> = "abcdef".chars().take_while_indexed(|_, index| index < 3).collect();
    /// assert_eq!(head, vec!['a', 'b', 'c']);
    /// ```
    fn take_while_indexed<Predicate>(self, predicate: Predicate) -> TakeWhile<Self, Predicate>
    where
        Predicate: FnMut(&Self::Item, usize) -> bool,
    {
        ContinuationIter::new(self, TakeWhileStep::new(predicate))
    }

    /// Skips elements while the indexed predicate holds; once it fails, every
    /// later element is yielded without consulting it.
    fn skip_while_indexed<Predicate>(self, predicate: Predicate) -> SkipWhile<Self, Predicate>
    where
        Predicate: FnMut(&Self::Item, usize) -> bool,
    {
        ContinuationIter::new(self, SkipWhileStep::new(predicate))
    }

    /// Drives the iterator with a custom continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::{Continuation, SequenceExt};
    ///
    /// // every other element, doubled, until a zero
    /// let values: Vec<i32> = vec![1, 2, 3, 4, 0, 5]
    ///     .into_iter()
    ///     .with_continuation(|value, position| match (value, position.index % 2) {
    ///         (0, _) => Continuation::Stop,
    ///         (value, 0) => Continuation::Take(value * 2),
    ///         _ => Continuation::Skip,
    ///     })
    ///     .collect();
    /// assert_eq!(values, vec![2, 6]);
    /// ```
    fn with_continuation<T, Step>(self, continuation: Step) -> ContinuationIter<Self, Step>
    where
        Step: FnMut(Self::Item, Position) -> Continuation<T>,
    {
        ContinuationIter::new(self, continuation)
    }

    /// Yields the elements not contained in `second`, each at most once.
    ///
    /// `second` is collected into a set when the first element is pulled.
    fn except<J>(self, second: J) -> Except<Self, J>
    where
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Eq + Hash + Clone,
    {
        ExceptBy::new(self, second, <Self::Item as Clone>::clone as fn(&Self::Item) -> Self::Item)
    }

    /// Yields the elements whose key is not in `second_keys`, each key at
    /// most once.
    fn except_by_key<J, K, KeySelector>(
        self,
        second_keys: J,
        key_selector: KeySelector,
    ) -> ExceptBy<Self, J, K, KeySelector>
    where
        J: IntoIterator<Item = K>,
        K: Eq + Hash,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        ExceptBy::new(self, second_keys, key_selector)
    }

    /// Yields the elements whose key removes a key from `second_keys`.
    ///
    /// Each key admits at most one element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::SequenceExt;
    ///
    /// let firsts: Vec<(&str, i32)> = vec![("a", 1), ("a", 2)]
    ///     .into_iter()
    ///     .intersect_by(vec!["a"], |pair| pair.0)
    ///     .collect();
    /// assert_eq!(firsts, vec![("a", 1)]);
    /// ```
    fn intersect_by<J, K, KeySelector>(
        self,
        second_keys: J,
        key_selector: KeySelector,
    ) -> IntersectBy<Self, J, K, KeySelector>
    where
        J: IntoIterator<Item = K>,
        K: Eq + Hash,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        IntersectBy::new(self, second_keys, key_selector)
    }

    /// Yields every element, then `element`.
    fn append(self, element: Self::Item) -> Append<Self, Self::Item> {
        Append::new(self, element)
    }

    /// Groups every element by key, keeping first-appearance order.
    fn group_by<K, KeySelector>(self, key_selector: KeySelector) -> Lookup<K, Self::Item>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
    {
        group_by::group_by_element(self, key_selector, |item| item)
    }

    /// Groups projected elements by key.
    fn group_by_element<K, V, KeySelector, ElementSelector>(
        self,
        key_selector: KeySelector,
        element_selector: ElementSelector,
    ) -> Lookup<K, V>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
        ElementSelector: FnMut(Self::Item) -> V,
    {
        group_by::group_by_element(self, key_selector, element_selector)
    }

    /// Groups projected elements by key and reduces each group.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::SequenceExt;
    ///
    /// let totals = vec![("x", 1), ("y", 2), ("x", 3)]
    ///     .into_iter()
    ///     .group_by_result(|pair| pair.0, |pair| pair.1, |key, values| (key, values.iter().sum::<i32>()));
    /// assert_eq!(totals, vec![("x", 4), ("y", 2)]);
    /// ```
    fn group_by_result<K, V, R, KeySelector, ElementSelector, ResultSelector>(
        self,
        key_selector: KeySelector,
        element_selector: ElementSelector,
        result_selector: ResultSelector,
    ) -> Vec<R>
    where
        K: Eq + Hash + Clone,
        KeySelector: FnMut(&Self::Item) -> K,
        ElementSelector: FnMut(Self::Item) -> V,
        ResultSelector: FnMut(K, Vec<V>) -> R,
    {
        group_by::project(
            group_by::group_by_element(self, key_selector, element_selector),
            result_selector,
        )
    }

    /// Splits into two lazy halves sharing this iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::SequenceExt;
    ///
    /// let (small, large) = (1..=6).partition_lazy(|value| *value <= 3).into_parts();
    /// assert_eq!(large.collect::<Vec<_>>(), vec![4, 5, 6]);
    /// assert_eq!(small.collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    fn partition_lazy<Predicate>(
        self,
        predicate: Predicate,
    ) -> Partition<PartitionHalf<Self, Predicate>, PartitionHalf<Self, Predicate>>
    where
        Predicate: FnMut(&Self::Item) -> bool,
    {
        partition::partition_lazy(self, predicate)
    }

    /// Splits into `(non_matches, matches)`.
    fn pick_into<Predicate>(
        self,
        predicate: Predicate,
    ) -> (PartitionHalf<Self, Predicate>, PartitionHalf<Self, Predicate>)
    where
        Predicate: FnMut(&Self::Item) -> bool,
    {
        let Partition { matches, non_matches } = partition::partition_lazy(self, predicate);
        (non_matches, matches)
    }

    /// Pairs every element with the group of `inner` elements sharing its key.
    ///
    /// `inner` is grouped once, on the first pull.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::SequenceExt;
    ///
    /// let joined: Vec<(char, Vec<i32>)> = vec!['A', 'B']
    ///     .into_iter()
    ///     .group_join(
    ///         vec![('A', 1), ('B', 2), ('A', 3)],
    ///         |outer| *outer,
    ///         |inner| inner.0,
    ///         |outer, group| (outer, group.iter().map(|pair| pair.1).collect()),
    ///     )
    ///     .collect();
    /// assert_eq!(joined, vec![('A', vec![1, 3]), ('B', vec![2])]);
    /// ```
    fn group_join<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> GroupJoin<Self, J, K, J::Item, OuterKey, InnerKey, Selector>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(Self::Item, &[J::Item]) -> R,
    {
        GroupJoin::new(self, inner, outer_key, inner_key, selector)
    }

    /// Yields one result per (element, matching `inner` element) pair.
    ///
    /// Elements without a match yield nothing.
    fn join<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> Join<Self, J, K, J::Item, OuterKey, InnerKey, Selector>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&Self::Item, &J::Item) -> R,
    {
        Join::new(self, inner, outer_key, inner_key, selector)
    }

    /// Group join against an inner side that may have failed.
    ///
    /// A failed inner side yields exactly one failure and never pulls this
    /// iterator.
    #[allow(clippy::type_complexity)]
    fn try_group_join<J, F, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> TryJoin<GroupJoinOk<Lifted<Self, F>, J, K, J::Item, OuterKey, InnerKey, Selector>, Lifted<Self, F>, F>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(Self::Item, &[J::Item]) -> R,
    {
        match inner {
            Ok(inner) => TryJoin::Joined(GroupJoinOk::new(lift(self), inner, outer_key, inner_key, selector)),
            Err(failure) => TryJoin::failed(None, failure),
        }
    }

    /// Join against an inner side that may have failed.
    #[allow(clippy::type_complexity)]
    fn try_join<J, F, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> TryJoin<JoinOk<Lifted<Self, F>, J, K, J::Item, OuterKey, InnerKey, Selector, Self::Item>, Lifted<Self, F>, F>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&Self::Item) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&Self::Item, &J::Item) -> R,
    {
        match inner {
            Ok(inner) => TryJoin::Joined(JoinOk::new(lift(self), inner, outer_key, inner_key, selector)),
            Err(failure) => TryJoin::failed(None, failure),
        }
    }

    /// Validates every element, yielding `Ok(element)` or the validation failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ensure;
    /// use railyard::sequence::SequenceExt;
    ///
    /// let checked: Vec<Result<i32, String>> = vec![4, -1]
    ///     .into_iter()
    ///     .where_valid(|value| ensure(*value >= 0, format!("{value} is negative")))
    ///     .collect();
    /// assert_eq!(checked, vec![Ok(4), Err("-1 is negative".to_string())]);
    /// ```
    fn where_valid<F, Validate>(self, validate: Validate) -> WhereValid<Self, Validate>
    where
        Validate: FnMut(&Self::Item) -> Result<(), F>,
    {
        WhereValid::new(self, validate)
    }

    /// Maps each element to `Some(element)`, or `None` when `check` rejects it.
    fn where_present<Check>(self, check: Check) -> WherePresent<Self, Check>
    where
        Check: FnMut(&Self::Item) -> Option<()>,
    {
        WherePresent::new(self, check)
    }

    /// Wraps the iterator in a buffer that many readers can replay.
    #[cfg(feature = "replay")]
    fn replayable(self) -> crate::replay::Replayable<Self> {
        crate::replay::Replayable::new(self)
    }

    /// Lifts the iterator into a `Stream` that is always ready.
    #[cfg(feature = "async")]
    fn into_stream(self) -> futures::stream::Iter<Self> {
        futures::stream::iter(self)
    }
}

impl<I: Iterator> SequenceExt for I {}

/// Joins for iterators whose elements are `Result`s.
///
/// Outer failures pass through in place; only successes are joined, and the
/// inner side is grouped when the first success arrives.
pub trait ResultSequenceExt<T, F>: Iterator<Item = Result<T, F>> + Sized {
    /// Group join of the successes; failures pass through.
    fn group_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> GroupJoinOk<Self, J, K, J::Item, OuterKey, InnerKey, Selector>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(T, &[J::Item]) -> R,
    {
        GroupJoinOk::new(self, inner, outer_key, inner_key, selector)
    }

    /// Join of the successes; failures pass through.
    fn join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> JoinOk<Self, J, K, J::Item, OuterKey, InnerKey, Selector, T>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&T, &J::Item) -> R,
    {
        JoinOk::new(self, inner, outer_key, inner_key, selector)
    }

    /// Validates every success; failures pass through unvalidated.
    fn where_valid_ok<Validate>(self, validate: Validate) -> WhereValidOk<Self, Validate>
    where
        Validate: FnMut(&T) -> Result<(), F>,
    {
        WhereValidOk::new(self, validate)
    }

    /// Group join against an inner side that may have failed.
    ///
    /// A failed inner side yields this iterator's own failures, then the
    /// inner failure last.
    #[allow(clippy::type_complexity)]
    fn try_group_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> TryJoin<GroupJoinOk<Self, J, K, J::Item, OuterKey, InnerKey, Selector>, Self, F>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(T, &[J::Item]) -> R,
    {
        match inner {
            Ok(inner) => TryJoin::Joined(GroupJoinOk::new(self, inner, outer_key, inner_key, selector)),
            Err(failure) => TryJoin::failed(Some(self), failure),
        }
    }

    /// Join against an inner side that may have failed.
    #[allow(clippy::type_complexity)]
    fn try_join_ok<J, K, OuterKey, InnerKey, Selector, R>(
        self,
        inner: Result<J, F>,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> TryJoin<JoinOk<Self, J, K, J::Item, OuterKey, InnerKey, Selector, T>, Self, F>
    where
        J: IntoIterator,
        K: Eq + Hash + Clone,
        OuterKey: FnMut(&T) -> K,
        InnerKey: FnMut(&J::Item) -> K,
        Selector: FnMut(&T, &J::Item) -> R,
    {
        match inner {
            Ok(inner) => TryJoin::Joined(JoinOk::new(self, inner, outer_key, inner_key, selector)),
            Err(failure) => TryJoin::failed(Some(self), failure),
        }
    }
}

impl<I, T, F> ResultSequenceExt<T, F> for I where I: Iterator<Item = Result<T, F>> {}

/// Validation for iterators whose elements are `Option`s.
pub trait OptionSequenceExt<T>: Iterator<Item = Option<T>> + Sized {
    /// Checks every present value; `None` passes through unchecked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::sequence::OptionSequenceExt;
    ///
    /// let even: Vec<Option<i32>> = vec![Some(2), None, Some(3)]
    ///     .into_iter()
    ///     .where_some(|value| (value % 2 == 0).then_some(()))
    ///     .collect();
    /// assert_eq!(even, vec![Some(2), None, None]);
    /// ```
    fn where_some<Check>(self, check: Check) -> WhereSome<Self, Check>
    where
        Check: FnMut(&T) -> Option<()>,
    {
        WhereSome::new(self, check)
    }
}

impl<I, T> OptionSequenceExt<T> for I where I: Iterator<Item = Option<T>> {}
