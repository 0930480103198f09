//! Grouping a whole sequence by key.
//!
//! Grouping is eager by nature: no group is complete until the source is.
//! The synchronous form materializes immediately; the stream form returns a
//! future that resolves once the stream ends.

use std::hash::Hash;

use crate::join::{Grouping, Lookup};

pub(crate) fn group_by_element<I, K, V, KeySelector, ElementSelector>(
    source: I,
    mut key_selector: KeySelector,
    mut element_selector: ElementSelector,
) -> Lookup<K, V>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KeySelector: FnMut(&I::Item) -> K,
    ElementSelector: FnMut(I::Item) -> V,
{
    let mut lookup = Lookup::new();
    for item in source {
        lookup.push(key_selector(&item), element_selector(item));
    }
    lookup
}

pub(crate) fn project<K, V, R, ResultSelector>(
    lookup: Lookup<K, V>,
    mut result_selector: ResultSelector,
) -> Vec<R>
where
    ResultSelector: FnMut(K, Vec<V>) -> R,
{
    lookup
        .into_iter()
        .map(Grouping::into_parts)
        .map(|(key, elements)| result_selector(key, elements))
        .collect()
}
