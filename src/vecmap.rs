use hashbrown::HashMap;
use std::{
    borrow::Borrow,
    collections::BTreeMap,
    hash::{BuildHasher, Hash},
    iter::FromIterator,
    slice::Iter,
    vec::IntoIter,
};

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Default)]
/// A map implemented as a `Vec` of pairs sorted by key.
///
/// Construction from unsorted pairs keeps the last value written for any
/// duplicated key.
pub struct VecMap<K: Ord, V>(Vec<(K, V)>);

impl<K: Ord, V> VecMap<K, V> {
    /// Creates a new `VecMap`.
    pub fn new() -> VecMap<K, V> {
        VecMap(Vec::new())
    }

    /// Creates a new `VecMap` with preallocated capacity.
    pub fn with_capacity(cap: usize) -> VecMap<K, V> {
        VecMap(Vec::with_capacity(cap))
    }

    /// Creates a `VecMap` from a `Vec` of pairs already sorted by key.
    pub fn from_sorted(v: Vec<(K, V)>) -> Self {
        debug_assert!(v.windows(2).all(|w| w[0].0 <= w[1].0));
        VecMap(v)
    }

    /// Returns length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether or not the `VecMap` is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an `Iter` of key value pairs.
    pub fn iter(&self) -> Iter<'_, (K, V)> {
        self.0.iter()
    }

    /// Looks up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.0
            .binary_search_by(|(k, _)| k.borrow().cmp(key))
            .ok()
            .map(|i| &self.0[i].1)
    }

    /// Indicates whether a value is stored under `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Inserts a pair, returning the value previously stored under the key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.0.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i].1, value)),
            Err(i) => {
                self.0.insert(i, (key, value));
                None
            }
        }
    }
}

impl<K: Ord + Hash, V> VecMap<K, V> {
    /// Consumes a `VecMap`, producing a `HashMap` from the entries.
    pub fn into_hashmap<S: BuildHasher + Default>(self) -> HashMap<K, V, S> {
        self.into_iter().collect()
    }
}

impl<K: Ord, V> From<Vec<(K, V)>> for VecMap<K, V> {
    fn from(mut v: Vec<(K, V)>) -> Self {
        // stable sort keeps write order within a key; the later value of
        // each duplicate run is then swapped into the kept slot
        v.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        v.dedup_by(|a, b| {
            if a.0 == b.0 {
                std::mem::swap(&mut a.1, &mut b.1);
                true
            } else {
                false
            }
        });
        VecMap(v)
    }
}

impl<K: Ord + Hash, V, S: BuildHasher> From<HashMap<K, V, S>> for VecMap<K, V> {
    fn from(hm: HashMap<K, V, S>) -> Self {
        let v: Vec<(K, V)> = hm.into_iter().collect();
        v.into()
    }
}

impl<K: Ord, V> IntoIterator for VecMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> {
        self.0.into_iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for VecMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        VecMap::from(Vec::from_iter(iter))
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for VecMap<K, V> {
    fn from(bt: BTreeMap<K, V>) -> Self {
        Self::from_iter(bt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_keep_last() {
        let m = VecMap::from(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a"), Some(&3));
        assert_eq!(m.get("b"), Some(&2));
    }

    #[test]
    fn insert_replaces() {
        let mut m = VecMap::new();
        assert_eq!(m.insert("k", 1), None);
        assert_eq!(m.insert("k", 2), Some(1));
        assert_eq!(m.get("k"), Some(&2));
        assert!(!m.contains_key("missing"));
    }
}
