//! Lazy joins over iterators.
//!
//! Every adapter here is built on two engines that operate on an outer side
//! of `Result<T, F>`: [`GroupJoinOk`] and [`JoinOk`]. Failures of the outer
//! side pass straight through; successes are keyed and matched against a
//! [`Lookup`] of the inner side, which is built once, when the first success
//! arrives. Plain outer sides are lifted into `Result<T, Infallible>` and
//! unwrapped again by [`GroupJoin`] and [`Join`].

use std::convert::Infallible;
use std::hash::Hash;
use std::iter::{FusedIterator, Map};

use tracing::trace;

use crate::join::Lookup;
use crate::sequence::deferred::Deferred;

pub(crate) type Lifted<O, F> = Map<O, fn(<O as Iterator>::Item) -> Result<<O as Iterator>::Item, F>>;

pub(crate) fn lift<O, F>(outer: O) -> Lifted<O, F>
where
    O: Iterator,
{
    outer.map(Ok as fn(O::Item) -> Result<O::Item, F>)
}

#[inline]
pub(crate) fn into_ok<R>(result: Result<R, Infallible>) -> R {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// The inner side of a join, materialized into a [`Lookup`] on first demand.
pub(crate) struct LazyLookup<J, K, V, KeySelector> {
    state: Deferred<J, Lookup<K, V>>,
    key_selector: KeySelector,
}

impl<J, K, V, KeySelector> LazyLookup<J, K, V, KeySelector>
where
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    KeySelector: FnMut(&V) -> K,
{
    pub(crate) const fn new(inner: J, key_selector: KeySelector) -> Self {
        Self {
            state: Deferred::new(inner),
            key_selector,
        }
    }

    pub(crate) fn force(&mut self) -> &Lookup<K, V> {
        let key_selector = &mut self.key_selector;
        self.state.force_with(|inner| {
            let lookup = Lookup::from_iter_by(inner, key_selector);
            trace!(groups = lookup.len(), "materialized join lookup");
            lookup
        })
    }
}

// =============================================================================
// Group join
// =============================================================================

/// Group join over a `Result` outer side.
///
/// Yields one item per outer element: failures unchanged, successes paired
/// with the (possibly empty) slice of inner elements sharing their key.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct GroupJoinOk<O, J, K, V, OuterKey, InnerKey, Selector> {
    outer: O,
    lookup: LazyLookup<J, K, V, InnerKey>,
    outer_key: OuterKey,
    selector: Selector,
}

impl<O, J, K, V, OuterKey, InnerKey, Selector> GroupJoinOk<O, J, K, V, OuterKey, InnerKey, Selector>
where
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&V) -> K,
{
    pub(crate) const fn new(
        outer: O,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> Self {
        Self {
            outer,
            lookup: LazyLookup::new(inner, inner_key),
            outer_key,
            selector,
        }
    }
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, T, F, R> Iterator
    for GroupJoinOk<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator<Item = Result<T, F>>,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&T) -> K,
    InnerKey: FnMut(&V) -> K,
    Selector: FnMut(T, &[V]) -> R,
{
    type Item = Result<R, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let outer = match self.outer.next()? {
            Ok(outer) => outer,
            Err(failure) => return Some(Err(failure)),
        };
        let key = (self.outer_key)(&outer);
        let group = self.lookup.force().get(&key);
        Some(Ok((self.selector)(outer, group)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.outer.size_hint()
    }
}

/// Group join over a plain outer side.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct GroupJoin<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
{
    engine: GroupJoinOk<Lifted<O, Infallible>, J, K, V, OuterKey, InnerKey, Selector>,
}

impl<O, J, K, V, OuterKey, InnerKey, Selector> GroupJoin<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&V) -> K,
{
    pub(crate) fn new(
        outer: O,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> Self {
        Self {
            engine: GroupJoinOk::new(lift(outer), inner, outer_key, inner_key, selector),
        }
    }
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, R> Iterator
    for GroupJoin<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&O::Item) -> K,
    InnerKey: FnMut(&V) -> K,
    Selector: FnMut(O::Item, &[V]) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        self.engine.next().map(into_ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.engine.size_hint()
    }
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, R> FusedIterator
    for GroupJoin<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: FusedIterator,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&O::Item) -> K,
    InnerKey: FnMut(&V) -> K,
    Selector: FnMut(O::Item, &[V]) -> R,
{
}

// =============================================================================
// Join
// =============================================================================

/// Position inside the group of the outer element being joined.
pub(crate) struct Cursor<T> {
    pub(crate) outer: T,
    pub(crate) group: usize,
    pub(crate) next: usize,
}

/// Inner equality join over a `Result` outer side.
///
/// Yields outer failures unchanged, and one item per matching
/// (outer success, inner element) pair. An outer success without a match
/// yields nothing.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct JoinOk<O, J, K, V, OuterKey, InnerKey, Selector, T> {
    outer: O,
    lookup: LazyLookup<J, K, V, InnerKey>,
    cursor: Option<Cursor<T>>,
    outer_key: OuterKey,
    selector: Selector,
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, T> JoinOk<O, J, K, V, OuterKey, InnerKey, Selector, T>
where
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&V) -> K,
{
    pub(crate) const fn new(
        outer: O,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> Self {
        Self {
            outer,
            lookup: LazyLookup::new(inner, inner_key),
            cursor: None,
            outer_key,
            selector,
        }
    }
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, T, F, R> Iterator
    for JoinOk<O, J, K, V, OuterKey, InnerKey, Selector, T>
where
    O: Iterator<Item = Result<T, F>>,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&T) -> K,
    InnerKey: FnMut(&V) -> K,
    Selector: FnMut(&T, &V) -> R,
{
    type Item = Result<R, F>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cursor) = &mut self.cursor {
                let elements = self.lookup.force().group_at(cursor.group);
                if let Some(inner) = elements.get(cursor.next) {
                    cursor.next += 1;
                    return Some(Ok((self.selector)(&cursor.outer, inner)));
                }
                self.cursor = None;
            }

            let outer = match self.outer.next()? {
                Ok(outer) => outer,
                Err(failure) => return Some(Err(failure)),
            };
            let key = (self.outer_key)(&outer);
            if let Some(group) = self.lookup.force().position(&key) {
                self.cursor = Some(Cursor {
                    outer,
                    group,
                    next: 0,
                });
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Inner equality join over a plain outer side.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Join<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
{
    engine: JoinOk<Lifted<O, Infallible>, J, K, V, OuterKey, InnerKey, Selector, O::Item>,
}

impl<O, J, K, V, OuterKey, InnerKey, Selector> Join<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    InnerKey: FnMut(&V) -> K,
{
    pub(crate) fn new(
        outer: O,
        inner: J,
        outer_key: OuterKey,
        inner_key: InnerKey,
        selector: Selector,
    ) -> Self {
        Self {
            engine: JoinOk::new(lift(outer), inner, outer_key, inner_key, selector),
        }
    }
}

impl<O, J, K, V, OuterKey, InnerKey, Selector, R> Iterator for Join<O, J, K, V, OuterKey, InnerKey, Selector>
where
    O: Iterator,
    J: IntoIterator<Item = V>,
    K: Eq + Hash + Clone,
    OuterKey: FnMut(&O::Item) -> K,
    InnerKey: FnMut(&V) -> K,
    Selector: FnMut(&O::Item, &V) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        self.engine.next().map(into_ok)
    }
}

// =============================================================================
// Fallible inner side
// =============================================================================

/// A join whose inner side may itself have failed.
///
/// When the inner side is available this forwards the underlying join. When
/// it failed, the outer side's own failures are yielded first (a plain outer
/// side has none and is never pulled), then the inner failure as the last
/// item.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub enum TryJoin<Joined, O, F> {
    /// The inner side was available.
    Joined(Joined),
    /// The inner side failed.
    Failed {
        /// Outer failures still to forward; `None` for a plain outer side.
        outer: Option<O>,
        /// The inner failure, yielded last.
        failure: Option<F>,
    },
}

impl<Joined, O, F> TryJoin<Joined, O, F> {
    pub(crate) const fn failed(outer: Option<O>, failure: F) -> Self {
        Self::Failed {
            outer,
            failure: Some(failure),
        }
    }
}

impl<Joined, O, F, T, R> Iterator for TryJoin<Joined, O, F>
where
    Joined: Iterator<Item = Result<R, F>>,
    O: Iterator<Item = Result<T, F>>,
{
    type Item = Result<R, F>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Joined(joined) => joined.next(),
            Self::Failed { outer, failure } => {
                while let Some(source) = outer {
                    match source.next() {
                        Some(Err(outer_failure)) => return Some(Err(outer_failure)),
                        Some(Ok(_)) => {}
                        None => *outer = None,
                    }
                }
                failure.take().map(Err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn group_join_pairs_each_outer_with_its_group() {
        let inner = vec![('A', 1), ('B', 2), ('A', 3)];
        let joined: Vec<(char, Vec<i32>)> = GroupJoin::new(
            vec!['A', 'B', 'C'].into_iter(),
            inner,
            |outer: &char| *outer,
            |inner: &(char, i32)| inner.0,
            |outer: char, group: &[(char, i32)]| (outer, group.iter().map(|pair| pair.1).collect()),
        )
        .collect();

        assert_eq!(
            joined,
            vec![('A', vec![1, 3]), ('B', vec![2]), ('C', vec![])]
        );
    }

    #[rstest]
    fn join_flattens_matches_and_drops_unmatched() {
        let joined: Vec<(i32, char)> = Join::new(
            vec![1, 2, 3].into_iter(),
            vec![(1, 'a'), (3, 'b'), (1, 'c')],
            |outer: &i32| *outer,
            |inner: &(i32, char)| inner.0,
            |outer: &i32, inner: &(i32, char)| (*outer, inner.1),
        )
        .collect();

        assert_eq!(joined, vec![(1, 'a'), (1, 'c'), (3, 'b')]);
    }

    #[rstest]
    fn lookup_is_not_built_for_failures_only() {
        let mut built = false;
        let inner = std::iter::from_fn(|| {
            built = true;
            None::<i32>
        });
        let joined: Vec<Result<i32, &str>> = GroupJoinOk::new(
            vec![Err("a"), Err("b")].into_iter(),
            inner,
            |outer: &i32| *outer,
            |inner: &i32| *inner,
            |outer: i32, _: &[i32]| outer,
        )
        .collect();

        assert_eq!(joined, vec![Err("a"), Err("b")]);
        assert!(!built);
    }

    #[rstest]
    fn failed_inner_yields_outer_failures_then_inner_failure() {
        let outer = vec![Ok(1), Err("x"), Ok(2), Err("y")].into_iter();
        let joined: Vec<Result<i32, &str>> =
            TryJoin::<std::iter::Empty<Result<i32, &str>>, _, _>::failed(Some(outer), "inner").collect();
        assert_eq!(joined, vec![Err("x"), Err("y"), Err("inner")]);
    }
}
