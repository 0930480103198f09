//! Hasher selection for lookups and exclusion sets.
//!
//! Joins, `except`, `intersect_by` and `group_by` all hash their keys. The
//! hasher is chosen at compile time:
//!
//! - `fxhash` feature: `rustc_hash::FxBuildHasher`
//! - `ahash` feature (without `fxhash`): `ahash::RandomState`
//! - neither: the standard library's SipHash `RandomState`
//!
//! Every builder here implements `Default`, so collections are created with
//! `HashMap::default()` / `HashSet::default()` regardless of the feature set.

/// The hash builder used by every keyed structure in this crate.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// The hash builder used by every keyed structure in this crate.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = ahash::RandomState;

/// The hash builder used by every keyed structure in this crate.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

/// A `HashMap` using [`DefaultHashBuilder`].
pub type HashMap<K, V> = std::collections::HashMap<K, V, DefaultHashBuilder>;

/// A `HashSet` using [`DefaultHashBuilder`].
pub type HashSet<T> = std::collections::HashSet<T, DefaultHashBuilder>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_collections_are_constructible() {
        let mut map: HashMap<&str, i32> = HashMap::default();
        map.insert("key", 1);
        assert_eq!(map.get("key"), Some(&1));

        let set: HashSet<i32> = [1, 2, 2, 3].into_iter().collect();
        assert_eq!(set.len(), 3);
    }
}
