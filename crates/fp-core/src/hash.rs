//! Fast hash map alias.
//!
//! Event logs are keyed by short basename strings and never exposed to
//! untrusted input, so the Fx hash from `rustc-hash` is used instead of the
//! standard library's DoS-resistant default.

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without reallocating.
///
/// # Examples
///
/// ```
/// use fp_core::fx_hash_map_with_capacity;
///
/// let map: fp_core::FxHashMap<String, u32> = fx_hash_map_with_capacity(8);
/// assert!(map.capacity() >= 8);
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, i32> = fx_hash_map_with_capacity(2);
        map.insert("1byte", 1);
        map.insert("1M", 2);
        assert_eq!(map.get("1byte"), Some(&1));
        assert_eq!(map.get("1and1M"), None);
    }
}
