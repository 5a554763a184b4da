use std::hash::{BuildHasher, Hash};

/// Smallest bucket count a non-empty table will be built with.
const MIN_BUCKETS: usize = 16;

#[inline(always)]
const fn bucket_index(hash: u64, bucket_bits: u8) -> usize {
    if bucket_bits == 0 {
        0
    } else {
        (hash >> (64 - bucket_bits as u32)) as usize
    }
}

/// Separate-chaining map that selects buckets from the *high-order* bits of
/// the hash.
///
/// The bucket count is a power of two and the top `bucket_bits` of a key's
/// hash pick the bucket; colliding entries chain within it. The table
/// rehashes at double the bucket count once the load factor reaches one.
/// Counterpart to `std::collections::HashMap`, which masks the low-order
/// bits for its bucket index.
pub struct BucketMap<K, V, S> {
    bucket_bits: u8,
    len: usize,
    buckets: Vec<Vec<(u64, K, V)>>,
    hash_builder: S,
}

impl<K: Hash + Eq, V, S: BuildHasher> BucketMap<K, V, S> {
    #[inline(always)]
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            bucket_bits: 0,
            len: 0,
            buckets: Vec::new(),
            hash_builder,
        }
    }

    #[inline(always)]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let mut map = Self::with_hasher(hash_builder);
        if capacity > 0 {
            map.rehash(capacity);
        }
        map
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries the table can hold before its next rehash.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Empty the map without giving up its buckets or their chain storage.
    ///
    /// A map reserved for N elements stays reserved for N elements, so
    /// repeated fill/clear cycles never re-allocate.
    #[inline(always)]
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Grow the table so it can hold at least `capacity` entries without
    /// rehashing.
    #[inline(always)]
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.buckets.len() {
            self.rehash(capacity);
        }
    }

    #[inline(always)]
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.len == 0 {
            return None;
        }
        let hash = self.hash_builder.hash_one(key);
        self.buckets[bucket_index(hash, self.bucket_bits)]
            .iter()
            .find(|(h, k, _)| *h == hash && k == key)
            .map(|(_, _, v)| v)
    }

    #[inline(always)]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.buckets.is_empty() {
            self.rehash(MIN_BUCKETS);
        }
        let hash = self.hash_builder.hash_one(&key);
        for (h, k, v) in self.buckets[bucket_index(hash, self.bucket_bits)].iter_mut() {
            if *h == hash && *k == key {
                return Some(std::mem::replace(v, value));
            }
        }
        // Only a genuinely new entry counts against the load factor.
        if self.len >= self.buckets.len() {
            self.rehash(self.buckets.len() * 2);
        }
        self.buckets[bucket_index(hash, self.bucket_bits)].push((hash, key, value));
        self.len += 1;
        None
    }

    fn rehash(&mut self, min_buckets: usize) {
        let count = min_buckets.max(MIN_BUCKETS).next_power_of_two();
        let bucket_bits = count.trailing_zeros() as u8;
        let mut buckets: Vec<Vec<(u64, K, V)>> = Vec::with_capacity(count);
        buckets.resize_with(count, Vec::new);
        for (hash, key, value) in std::mem::take(&mut self.buckets).into_iter().flatten() {
            buckets[bucket_index(hash, bucket_bits)].push((hash, key, value));
        }
        self.buckets = buckets;
        self.bucket_bits = bucket_bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{BitLayout, Key, LayoutBuild};
    use std::hash::RandomState;

    fn new_map() -> BucketMap<String, i32, RandomState> {
        BucketMap::with_hasher(RandomState::new())
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = new_map();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        for i in 0..32 {
            assert_eq!(map.insert(format!("key{i}"), i), None);
            assert_eq!(map.len(), (i + 1) as usize);
        }
        for i in 0..32 {
            assert_eq!(map.get(&format!("key{i}")), Some(&i));
        }
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_update_returns_old_value() {
        let mut map = new_map();
        assert_eq!(map.insert("k".to_string(), 1), None);
        assert_eq!(map.insert("k".to_string(), 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"k".to_string()), Some(&2));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map: BucketMap<String, i32, RandomState> =
            BucketMap::with_capacity_and_hasher(256, RandomState::new());
        let reserved = map.capacity();
        assert!(reserved >= 256);
        for i in 0..100 {
            map.insert(i.to_string(), i);
        }
        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), reserved);
        assert_eq!(map.get(&"1".to_string()), None);
        // Still usable after clearing.
        map.insert("again".to_string(), 7);
        assert_eq!(map.get(&"again".to_string()), Some(&7));
    }

    #[test]
    fn test_growth_preserves_entries() {
        let mut map = new_map();
        let n = 1_000;
        for i in 0..n {
            map.insert(i.to_string(), i * 2);
        }
        assert_eq!(map.len(), n as usize);
        for i in 0..n {
            assert_eq!(map.get(&i.to_string()), Some(&(i * 2)));
        }
    }

    #[test]
    fn test_reserve_preserves_entries() {
        let mut map = new_map();
        for i in 0..50 {
            map.insert(i.to_string(), i);
        }
        map.reserve(4096);
        assert!(map.capacity() >= 4096);
        assert_eq!(map.len(), 50);
        for i in 0..50 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn test_clustered_hashes_still_resolve() {
        // Under the text-high layout with one shared text, every hash has an
        // identical high half, so all keys chain in a single bucket. The map
        // must stay correct even while clustering.
        let mut map: BucketMap<Key, u8, LayoutBuild> =
            BucketMap::with_capacity_and_hasher(64, LayoutBuild::new(BitLayout::TextHigh));
        for i in 0..64u32 {
            map.insert(Key::new(i, "shared"), (i % 256) as u8);
        }
        assert_eq!(map.len(), 64);
        for i in 0..64u32 {
            assert_eq!(map.get(&Key::new(i, "shared")), Some(&((i % 256) as u8)));
        }
    }

    #[test]
    fn test_update_at_full_load_does_not_rehash() {
        let mut map: BucketMap<i32, i32, RandomState> =
            BucketMap::with_capacity_and_hasher(16, RandomState::new());
        for i in 0..16 {
            map.insert(i, i);
        }
        let cap = map.capacity();
        assert_eq!(map.len(), cap);
        // Updating in place at load factor one must not grow the table.
        assert_eq!(map.insert(3, 33), Some(3));
        assert_eq!(map.capacity(), cap);
        assert_eq!(map.len(), 16);
        assert_eq!(map.get(&3), Some(&33));
        // A new key at load factor one still does.
        assert_eq!(map.insert(100, 100), None);
        assert!(map.capacity() > cap);
        assert_eq!(map.get(&100), Some(&100));
    }

    #[test]
    fn test_zero_capacity_hint() {
        let mut map: BucketMap<i32, i32, RandomState> =
            BucketMap::with_capacity_and_hasher(0, RandomState::new());
        assert_eq!(map.capacity(), 0);
        map.insert(1, 10);
        assert!(map.capacity() >= MIN_BUCKETS);
        assert_eq!(map.get(&1), Some(&10));
    }
}
