//! Set difference and keyed intersection over lazy iterators.
//!
//! Both adapters stream `first` and consult a hash set built from `second`.
//! The set is built exactly once, when the first element of `first` is
//! pulled; an empty `first` never touches `second`.
//!
//! The two treat duplicates in `first` differently:
//!
//! - [`ExceptBy`] inserts every yielded key into the set, so a key is yielded
//!   at most once (`[1, 2, 2, 3] except [2] == [1, 3]`, `[1, 1] except [] == [1]`).
//! - [`IntersectBy`] removes a key once it matched, so each key of `second`
//!   admits at most one element of `first`.

use std::hash::Hash;
use std::iter::FusedIterator;

use crate::hash::HashSet;
use crate::sequence::deferred::Deferred;

/// Elements of `first` whose key is neither in `second` nor already yielded.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ExceptBy<I, J, K, KeySelector> {
    first: I,
    excluded: Deferred<J, HashSet<K>>,
    key_selector: KeySelector,
}

impl<I, J, K, KeySelector> ExceptBy<I, J, K, KeySelector> {
    pub(crate) const fn new(first: I, second: J, key_selector: KeySelector) -> Self {
        Self {
            first,
            excluded: Deferred::new(second),
            key_selector,
        }
    }
}

impl<I, J, K, KeySelector> Iterator for ExceptBy<I, J, K, KeySelector>
where
    I: Iterator,
    J: IntoIterator<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.first.next()?;
            let excluded = self.excluded.force_with(|second| second.into_iter().collect());
            if excluded.insert((self.key_selector)(&item)) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.first.size_hint().1)
    }
}

impl<I, J, K, KeySelector> FusedIterator for ExceptBy<I, J, K, KeySelector>
where
    I: FusedIterator,
    J: IntoIterator<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&I::Item) -> K,
{
}

/// Iterator returned by [`except`](crate::sequence::SequenceExt::except).
pub type Except<I, J> =
    ExceptBy<I, J, <I as Iterator>::Item, fn(&<I as Iterator>::Item) -> <I as Iterator>::Item>;

/// Elements of `first` whose key removes a key of `second`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntersectBy<I, J, K, KeySelector> {
    first: I,
    remaining: Deferred<J, HashSet<K>>,
    key_selector: KeySelector,
}

impl<I, J, K, KeySelector> IntersectBy<I, J, K, KeySelector> {
    pub(crate) const fn new(first: I, second: J, key_selector: KeySelector) -> Self {
        Self {
            first,
            remaining: Deferred::new(second),
            key_selector,
        }
    }
}

impl<I, J, K, KeySelector> Iterator for IntersectBy<I, J, K, KeySelector>
where
    I: Iterator,
    J: IntoIterator<Item = K>,
    K: Eq + Hash,
    KeySelector: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.first.next()?;
            let remaining = self.remaining.force_with(|second| second.into_iter().collect());
            if remaining.remove(&(self.key_selector)(&item)) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.first.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn except(first: Vec<i32>, second: Vec<i32>) -> Vec<i32> {
        Except::<_, _>::new(first.into_iter(), second, i32::clone as fn(&i32) -> i32).collect()
    }

    #[rstest]
    #[case(vec![1, 2, 2, 3], vec![2], vec![1, 3])]
    #[case(vec![1, 1], vec![], vec![1])]
    #[case(vec![], vec![1], vec![])]
    #[case(vec![4, 5], vec![4, 5], vec![])]
    fn except_suppresses_excluded_and_duplicates(
        #[case] first: Vec<i32>,
        #[case] second: Vec<i32>,
        #[case] expected: Vec<i32>,
    ) {
        assert_eq!(except(first, second), expected);
    }

    #[rstest]
    fn intersect_by_matches_each_key_once() {
        let first = vec![("a", 1), ("a", 2), ("b", 3)];
        let values: Vec<_> =
            IntersectBy::new(first.into_iter(), vec!["a", "b", "c"], |pair: &(&'static str, i32)| pair.0).collect();
        assert_eq!(values, vec![("a", 1), ("b", 3)]);
    }

    #[rstest]
    fn empty_first_never_pulls_second() {
        let mut pulled = false;
        let second = std::iter::from_fn(|| {
            pulled = true;
            None::<i32>
        });
        let values: Vec<i32> =
            ExceptBy::new(std::iter::empty::<i32>(), second, |value: &i32| *value).collect();
        assert!(values.is_empty());
        assert!(!pulled);
    }
}
