//! Multi-valued, insertion-ordered key index.

use std::hash::Hash;

use crate::hash::HashMap;

/// A key together with every element grouped under it.
///
/// Elements keep the order in which they were inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping<K, V> {
    key: K,
    elements: Vec<V>,
}

impl<K, V> Grouping<K, V> {
    /// The shared key.
    #[inline]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The grouped elements, in insertion order.
    #[inline]
    pub fn elements(&self) -> &[V] {
        &self.elements
    }

    /// The number of grouped elements; never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the grouping holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Splits into the key and the elements.
    #[inline]
    pub fn into_parts(self) -> (K, Vec<V>) {
        (self.key, self.elements)
    }
}

impl<K, V> IntoIterator for Grouping<K, V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Grouping<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// A key to elements index.
///
/// Groups are kept in order of first key appearance and elements within a
/// group in insertion order. Looking up a missing key yields an empty slice.
///
/// # Examples
///
/// ```rust
/// use railyard::join::Lookup;
///
/// let lookup: Lookup<char, &str> = [("apple", 'a'), ("banana", 'b'), ("avocado", 'a')]
///     .into_iter()
///     .map(|(word, initial)| (initial, word))
///     .collect();
///
/// assert_eq!(lookup.get(&'a'), ["apple", "avocado"]);
/// assert_eq!(lookup.get(&'z'), [] as [&str; 0]);
/// assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), vec!['a', 'b']);
/// ```
#[derive(Debug, Clone)]
pub struct Lookup<K, V> {
    positions: HashMap<K, usize>,
    groups: Vec<Grouping<K, V>>,
}

impl<K, V> Default for Lookup<K, V> {
    fn default() -> Self {
        Self {
            positions: HashMap::default(),
            groups: Vec::new(),
        }
    }
}

impl<K, V> Lookup<K, V> {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no element was inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates the groups in order of first key appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, V>> {
        self.groups.iter()
    }

    /// Iterates the keys in order of first appearance.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(Grouping::key)
    }

    pub(crate) fn group_at(&self, position: usize) -> &[V] {
        self.groups
            .get(position)
            .map_or(&[], |grouping| grouping.elements())
    }
}

impl<K, V> Lookup<K, V>
where
    K: Eq + Hash,
{
    /// The elements grouped under `key`, or an empty slice.
    pub fn get(&self, key: &K) -> &[V] {
        self.position(key).map_or(&[], |position| self.group_at(position))
    }

    /// Returns `true` if at least one element has `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub(crate) fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

impl<K, V> Lookup<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Adds `element` under `key`.
    pub fn push(&mut self, key: K, element: V) {
        if let Some(&position) = self.positions.get(&key) {
            self.groups[position].elements.push(element);
        } else {
            self.positions.insert(key.clone(), self.groups.len());
            self.groups.push(Grouping {
                key,
                elements: vec![element],
            });
        }
    }

    /// Builds a lookup from `elements`, keying each with `key_selector`.
    pub fn from_iter_by<I, KeySelector>(elements: I, mut key_selector: KeySelector) -> Self
    where
        I: IntoIterator<Item = V>,
        KeySelector: FnMut(&V) -> K,
    {
        let mut lookup = Self::new();
        for element in elements {
            lookup.push(key_selector(&element), element);
        }
        lookup
    }
}

impl<K, V> Extend<(K, V)> for Lookup<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, element) in iter {
            self.push(key, element);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Lookup<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        lookup.extend(iter);
        lookup
    }
}

impl<K, V> IntoIterator for Lookup<K, V> {
    type Item = Grouping<K, V>;
    type IntoIter = std::vec::IntoIter<Grouping<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Lookup<K, V> {
    type Item = &'a Grouping<K, V>;
    type IntoIter = std::slice::Iter<'a, Grouping<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
