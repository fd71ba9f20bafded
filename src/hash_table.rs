//! HashTable: open addressing over a randomized probe permutation.
//!
//! Layout: `buckets[i]` is slot `i`; `offsets` is the probe permutation
//! for the current capacity. A key's probe sequence is
//! `(home + offsets[p]) % capacity` for `p = 0..capacity`, where `home` is
//! its hash reduced modulo the capacity.
//!
//! Invariants
//! - `len == buckets.iter().filter(Bucket::is_normal).count()`.
//! - `tombstones == buckets.iter().filter(Bucket::is_empty_after_remove).count()`.
//! - Every live key is reachable from its home slot without crossing an
//!   EMPTY_SINCE_START bucket.
//! - After every insert, `len * 2 < capacity`.
//!
//! Every walk is bounded by `capacity` probes. The offsets are a
//! permutation, so a full walk covers the whole array once and ends even
//! when every vacant slot is a tombstone.

use crate::bucket::Bucket;
use crate::builder::TableBuilder;
use crate::error::TableError;
use crate::offsets::ProbeOffsets;
use core::fmt;
use core::hash::BuildHasher;
use core::ops::{Index, IndexMut};
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_CAPACITY: usize = 8;

/// Inserts resize once `len / capacity` reaches this ratio.
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// Stable reference to one live entry, obtained from [`HashTable::find`].
///
/// A handle names a slot together with the bucket generation and table
/// epoch it was issued under. It stops resolving once the entry is removed
/// or the table is rehashed by [`HashTable::resize`] or
/// [`HashTable::compact`]; it never resolves to a different entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u32,
    epoch: u64,
}

impl Handle {
    /// Storage index the entry occupied when the handle was issued.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn key<'a, S, R>(&self, table: &'a HashTable<S, R>) -> Option<&'a str> {
        table.handle_bucket(*self).and_then(Bucket::key)
    }

    pub fn value<'a, S, R>(&self, table: &'a HashTable<S, R>) -> Option<&'a i32> {
        table.handle_bucket(*self).and_then(Bucket::value)
    }

    pub fn value_mut<'a, S, R>(&self, table: &'a mut HashTable<S, R>) -> Option<&'a mut i32> {
        table.handle_bucket_mut(*self).and_then(Bucket::value_mut)
    }
}

pub struct HashTable<S = DefaultHashBuilder, R = StdRng> {
    buckets: Vec<Bucket>,
    offsets: ProbeOffsets,
    len: usize,
    tombstones: usize,
    // Bumped by every rehash; invalidates outstanding handles.
    epoch: u64,
    hasher: S,
    rng: R,
}

impl HashTable {
    /// Table with the default capacity (8), an OS-seeded permutation
    /// generator and the default hasher.
    pub fn new() -> Self {
        Self::from_parts(
            DEFAULT_CAPACITY,
            DefaultHashBuilder::default(),
            StdRng::from_os_rng(),
        )
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::builder().capacity(capacity).build()
    }

    /// Deterministic permutation generator: equal seeds give equal probe
    /// permutations at every capacity the table grows through.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, TableError> {
        Self::builder().capacity(capacity).seed(seed).build()
    }

    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs of live buckets in storage order.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Bucket>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i32);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(Bucket::entry)
    }
}

/// Iterator over keys of live buckets in storage order.
pub struct Keys<'a> {
    it: core::slice::Iter<'a, Bucket>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(Bucket::key)
    }
}

// Accessors that never hash.
impl<S, R> HashTable<S, R> {
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Load factor, `size / capacity`.
    pub fn alpha(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of EMPTY_AFTER_REMOVE buckets.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Keys in storage order. The order is not insertion order and changes
    /// on every rehash.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            it: self.buckets.iter(),
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.buckets.iter(),
        }
    }

    /// The probe permutation for the current capacity.
    pub fn offsets(&self) -> &ProbeOffsets {
        &self.offsets
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    fn resolve(&self, h: Handle) -> Option<usize> {
        if h.epoch != self.epoch {
            return None;
        }
        let b = self.buckets.get(h.slot)?;
        (b.is_normal() && b.generation() == h.generation).then_some(h.slot)
    }

    pub(crate) fn handle_bucket(&self, h: Handle) -> Option<&Bucket> {
        self.resolve(h).map(|slot| &self.buckets[slot])
    }

    pub(crate) fn handle_bucket_mut(&mut self, h: Handle) -> Option<&mut Bucket> {
        self.resolve(h).map(move |slot| &mut self.buckets[slot])
    }

    /// Overwrites the value behind a handle, returning the previous one.
    pub fn set(&mut self, handle: Handle, value: i32) -> Result<i32, TableError> {
        self.handle_bucket_mut(handle)
            .and_then(|b| b.set_value(value))
            .ok_or(TableError::StaleHandle)
    }
}

impl<S, R> HashTable<S, R>
where
    S: BuildHasher,
    R: Rng,
{
    /// Table with an explicit hasher and permutation generator.
    pub fn with_hasher_and_rng(capacity: usize, hasher: S, rng: R) -> Result<Self, TableError> {
        if capacity < 2 {
            return Err(TableError::InvalidCapacity { capacity });
        }
        Ok(Self::from_parts(capacity, hasher, rng))
    }

    pub(crate) fn from_parts(capacity: usize, hasher: S, mut rng: R) -> Self {
        let offsets = ProbeOffsets::shuffled(capacity, &mut rng);
        trace!("created table with capacity {}", capacity);
        Self {
            buckets: vec![Bucket::new(); capacity],
            offsets,
            len: 0,
            tombstones: 0,
            epoch: 0,
            hasher,
            rng,
        }
    }

    #[inline]
    fn home(&self, key: &str, capacity: usize) -> usize {
        (self.hasher.hash_one(key) % capacity as u64) as usize
    }

    /// Slot holding `key`, if any. Stops at the first EMPTY_SINCE_START and
    /// walks through tombstones.
    fn locate(&self, key: &str) -> Option<usize> {
        let home = self.home(key, self.capacity());
        for slot in self.offsets.probe(home) {
            let b = &self.buckets[slot];
            if b.holds(key) {
                return Some(slot);
            }
            if b.is_empty_since_start() {
                return None;
            }
        }
        None
    }

    /// `Ok(slot)` when `key` is live at `slot`; otherwise `Err(slot)` with
    /// the first empty bucket (either kind) on the key's probe walk.
    ///
    /// The walk continues past tombstones until EMPTY_SINCE_START so a live
    /// duplicate further along the chain is never shadowed.
    fn find_or_find_insert_slot(&self, key: &str) -> Result<usize, usize> {
        let home = self.home(key, self.capacity());
        let mut vacant = None;
        for slot in self.offsets.probe(home) {
            let b = &self.buckets[slot];
            if b.holds(key) {
                return Ok(slot);
            }
            if b.is_empty() {
                let first = *vacant.get_or_insert(slot);
                if b.is_empty_since_start() {
                    return Err(first);
                }
            }
        }
        match vacant {
            Some(slot) => Err(slot),
            None => unreachable!("load factor below 0.5 leaves a vacant bucket on every walk"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.locate(key).and_then(|slot| self.buckets[slot].value().copied())
    }

    /// In-place mutable lookup; never creates an entry.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut i32> {
        let slot = self.locate(key)?;
        self.buckets[slot].value_mut()
    }

    /// Handle to the live entry for `key`.
    ///
    /// This is the checked form of index access: a missing key is reported
    /// as [`TableError::KeyNotFound`] instead of creating an entry.
    pub fn find(&self, key: &str) -> Result<Handle, TableError> {
        match self.locate(key) {
            Some(slot) => Ok(Handle {
                slot,
                generation: self.buckets[slot].generation(),
                epoch: self.epoch,
            }),
            None => Err(TableError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Inserts or updates `key`. Returns `true` if the key was not present
    /// before, `false` if an existing value was overwritten.
    ///
    /// Grows the table once the load factor reaches [`MAX_LOAD_FACTOR`].
    pub fn insert(&mut self, key: &str, value: i32) -> bool {
        match self.find_or_find_insert_slot(key) {
            Ok(slot) => {
                self.buckets[slot].set_value(value);
                false
            }
            Err(slot) => {
                let bucket = &mut self.buckets[slot];
                if bucket.is_empty_after_remove() {
                    self.tombstones -= 1;
                }
                bucket.load(key.to_string(), value);
                self.len += 1;
                if self.len * 2 >= self.capacity() {
                    self.resize();
                }
                true
            }
        }
    }

    /// Leaves a tombstone in the key's bucket. Other entries never move.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(slot) = self.locate(key) else {
            return false;
        };
        let removed = self.buckets[slot].mark_removed();
        debug_assert!(removed.is_some());
        self.len -= 1;
        self.tombstones += 1;
        true
    }

    /// Doubles the capacity and rehashes every live entry under a freshly
    /// generated permutation. Outstanding handles go stale.
    pub fn resize(&mut self) {
        let capacity = self.capacity() * 2;
        self.rehash(capacity);
    }

    /// Rebuilds at the current capacity with a fresh permutation, dropping
    /// all tombstones. Outstanding handles go stale.
    pub fn compact(&mut self) {
        let capacity = self.capacity();
        self.rehash(capacity);
    }

    fn rehash(&mut self, capacity: usize) {
        let offsets = ProbeOffsets::shuffled(capacity, &mut self.rng);
        let mut buckets = vec![Bucket::new(); capacity];

        // The new array has no tombstones and no duplicates, so each entry
        // lands on the first EMPTY_SINCE_START of its walk.
        let old = core::mem::take(&mut self.buckets);
        let old_capacity = old.len();
        for (key, value) in old.into_iter().filter_map(Bucket::into_entry) {
            let home = self.home(&key, capacity);
            let slot = offsets
                .probe(home)
                .find(|&s| buckets[s].is_empty_since_start());
            match slot {
                Some(slot) => buckets[slot].load(key, value),
                None => unreachable!("rehash target holds fewer entries than buckets"),
            }
        }

        debug!(
            "rehashed table: capacity {} -> {}, {} live entries, {} tombstones dropped",
            old_capacity, capacity, self.len, self.tombstones
        );
        self.buckets = buckets;
        self.offsets = offsets;
        self.tombstones = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

/// Renders `[idx: <key, value>, ...]` over live buckets in storage order.
impl<S, R> fmt::Display for HashTable<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for (idx, b) in self.buckets.iter().enumerate().filter(|(_, b)| b.is_normal()) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}: {}", idx, b)?;
        }
        f.write_str("]")
    }
}

impl<S, R> fmt::Debug for HashTable<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Slots<'a>(&'a [Bucket]);
        impl fmt::Debug for Slots<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut m = f.debug_map();
                for (i, b) in self.0.iter().enumerate() {
                    if !b.is_empty_since_start() {
                        m.entry(&i, &format_args!("{}", b));
                    }
                }
                m.finish()
            }
        }

        f.debug_struct("HashTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("tombstones", &self.tombstones)
            .field("slots", &Slots(&self.buckets))
            .finish()
    }
}

/// Read access by key.
///
/// # Panics
///
/// Panics if `key` is not present, like `std::collections::HashMap`.
/// Use [`HashTable::get`] or [`HashTable::find`] for a checked lookup.
impl<S, R> Index<&str> for HashTable<S, R>
where
    S: BuildHasher,
    R: Rng,
{
    type Output = i32;

    fn index(&self, key: &str) -> &i32 {
        match self.locate(key).and_then(|slot| self.buckets[slot].value()) {
            Some(v) => v,
            None => panic!("key not found: {:?}", key),
        }
    }
}

/// In-place write access to an existing key. Never inserts.
///
/// # Panics
///
/// Panics if `key` is not present.
impl<S, R> IndexMut<&str> for HashTable<S, R>
where
    S: BuildHasher,
    R: Rng,
{
    fn index_mut(&mut self, key: &str) -> &mut i32 {
        match self.get_mut(key) {
            Some(v) => v,
            None => panic!("key not found: {:?}", key),
        }
    }
}

impl<K, S, R> Extend<(K, i32)> for HashTable<S, R>
where
    K: AsRef<str>,
    S: BuildHasher,
    R: Rng,
{
    fn extend<I: IntoIterator<Item = (K, i32)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v);
        }
    }
}

impl<K: AsRef<str>> FromIterator<(K, i32)> for HashTable {
    fn from_iter<I: IntoIterator<Item = (K, i32)>>(iter: I) -> Self {
        let mut table = HashTable::new();
        table.extend(iter);
        table
    }
}

impl<'a, S, R> IntoIterator for &'a HashTable<S, R> {
    type Item = (&'a str, i32);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::hash::Hasher;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        } // every key shares home slot 0
    }

    fn seeded() -> HashTable {
        HashTable::with_seed(DEFAULT_CAPACITY, 0xC0FFEE).unwrap()
    }

    fn colliding(capacity: usize) -> HashTable<ConstBuildHasher> {
        HashTable::with_hasher_and_rng(capacity, ConstBuildHasher, StdRng::seed_from_u64(1))
            .unwrap()
    }

    /// Recount the invariants from the bucket array.
    fn check_counts<S, R>(t: &HashTable<S, R>) {
        let live = t.buckets.iter().filter(|b| b.is_normal()).count();
        let dead = t.buckets.iter().filter(|b| b.is_empty_after_remove()).count();
        assert_eq!(t.len(), live);
        assert_eq!(t.tombstones(), dead);
    }

    /// Invariant: construction below two buckets fails; the default is 8.
    #[test]
    fn capacity_validation() {
        assert_eq!(
            HashTable::with_capacity(0).unwrap_err(),
            TableError::InvalidCapacity { capacity: 0 }
        );
        assert_eq!(
            HashTable::with_capacity(1).unwrap_err(),
            TableError::InvalidCapacity { capacity: 1 }
        );
        assert_eq!(HashTable::with_capacity(2).unwrap().capacity(), 2);
        assert_eq!(HashTable::new().capacity(), DEFAULT_CAPACITY);
        assert_eq!(HashTable::default().capacity(), DEFAULT_CAPACITY);
    }

    /// Invariant: the fourth insert into an 8-slot table reaches alpha 0.5
    /// and doubles the capacity.
    #[test]
    fn resize_triggers_at_half_load() {
        let mut t = seeded();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            assert!(t.insert(k, i as i32));
        }
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.alpha(), 3.0 / 8.0);

        assert!(t.insert("d", 3));
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.size(), 4);
        assert!(t.alpha() < MAX_LOAD_FACTOR);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            assert_eq!(t.get(k), Some(i as i32));
        }
    }

    /// Invariant: a two-slot table grows on its first insert.
    #[test]
    fn smallest_table_grows_immediately() {
        let mut t = HashTable::with_seed(2, 9).unwrap();
        assert!(t.insert("only", 1));
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.get("only"), Some(1));
    }

    /// Invariant: with every key on the same home slot, lookups walk the
    /// permutation and still resolve by exact key equality.
    #[test]
    fn collisions_follow_the_permutation() {
        let mut t = colliding(16);
        t.insert("a", 1);
        t.insert("b", 2);
        t.insert("c", 3);

        let order: Vec<usize> = t.offsets().probe(0).take(3).collect();
        assert_eq!(t.find("a").unwrap().slot(), order[0]);
        assert_eq!(t.find("b").unwrap().slot(), order[1]);
        assert_eq!(t.find("c").unwrap().slot(), order[2]);
        assert_eq!(t.get("b"), Some(2));
        assert!(!t.contains("d"));
    }

    /// Invariant: a tombstone earlier in a chain does not hide keys placed
    /// past it.
    #[test]
    fn lookups_walk_through_tombstones() {
        let mut t = colliding(16);
        t.insert("a", 1);
        t.insert("b", 2);
        t.insert("c", 3);

        assert!(t.remove("a"));
        assert_eq!(t.tombstones(), 1);
        assert!(t.contains("b"));
        assert!(t.contains("c"));
        assert!(t.remove("b"));
        assert_eq!(t.get("c"), Some(3));
        check_counts(&t);
    }

    /// Invariant: re-inserting a key that lives past a tombstone updates it
    /// in place instead of loading a duplicate into the tombstone.
    #[test]
    fn insert_does_not_duplicate_past_tombstone() {
        let mut t = colliding(16);
        t.insert("a", 1);
        t.insert("b", 2);
        t.remove("a");

        assert!(!t.insert("b", 20), "b is still present");
        assert_eq!(t.len(), 1);
        assert_eq!(t.keys().filter(|k| *k == "b").count(), 1);
        assert_eq!(t.get("b"), Some(20));
        assert_eq!(t.tombstones(), 1);
        check_counts(&t);
    }

    /// Invariant: a new key reuses the first tombstone on its walk.
    #[test]
    fn insert_reuses_first_tombstone() {
        let mut t = colliding(16);
        t.insert("a", 1);
        t.insert("b", 2);
        let slot_a = t.find("a").unwrap().slot();
        t.remove("a");

        assert!(t.insert("z", 26));
        assert_eq!(t.find("z").unwrap().slot(), slot_a);
        assert_eq!(t.tombstones(), 0);
        check_counts(&t);
    }

    /// Invariant: probe walks end even when no EMPTY_SINCE_START bucket
    /// remains anywhere in the array.
    #[test]
    fn walks_terminate_on_all_tombstone_tables() {
        let mut t = colliding(4);
        for b in t.buckets.iter_mut() {
            b.load("gone".to_string(), 0);
            b.mark_removed();
        }
        t.tombstones = 4;
        check_counts(&t);

        assert!(!t.contains("missing"));
        assert!(!t.remove("missing"));
        assert!(t.find("missing").is_err());
        assert!(t.insert("fresh", 1));
        assert_eq!(t.get("fresh"), Some(1));
        assert_eq!(t.find("fresh").unwrap().slot(), t.offsets().probe(0).next().unwrap());
        assert_eq!(t.tombstones(), 3);
        check_counts(&t);
    }

    /// Invariant: resize keeps every entry and count, and drops tombstones.
    #[test]
    fn resize_preserves_entries_and_clears_tombstones() {
        let mut t = seeded();
        t.insert("x", 1);
        t.insert("y", 2);
        t.remove("x");
        assert_eq!(t.tombstones(), 1);

        t.resize();
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.len(), 1);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.get("y"), Some(2));
        assert!(!t.contains("x"));
        check_counts(&t);
    }

    /// Invariant: compaction keeps capacity and entries, clears tombstones.
    #[test]
    fn compact_rebuilds_in_place() {
        let mut t = HashTable::with_seed(64, 5).unwrap();
        for i in 0..20 {
            t.insert(&format!("k{i}"), i);
        }
        for i in 0..15 {
            t.remove(&format!("k{i}"));
        }
        assert_eq!(t.tombstones(), 15);

        t.compact();
        assert_eq!(t.capacity(), 64);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.len(), 5);
        for i in 15..20 {
            assert_eq!(t.get(&format!("k{i}")), Some(i));
        }
        check_counts(&t);
    }

    /// Invariant: handles resolve to their entry, survive value updates,
    /// and go stale after removal or rehash.
    #[test]
    fn handle_lifecycle() {
        let mut t = HashTable::with_seed(32, 3).unwrap();
        t.insert("OOW", 103);
        let h = t.find("OOW").unwrap();
        assert_eq!(h.key(&t), Some("OOW"));
        assert_eq!(h.value(&t), Some(&103));

        assert_eq!(t.set(h, 203), Ok(103));
        assert_eq!(t.get("OOW"), Some(203));
        *h.value_mut(&mut t).unwrap() += 1;
        assert_eq!(t["OOW"], 204);

        // A value update through insert keeps the handle valid.
        t.insert("OOW", 5);
        assert_eq!(h.value(&t), Some(&5));

        t.remove("OOW");
        assert_eq!(h.value(&t), None);
        assert_eq!(t.set(h, 1), Err(TableError::StaleHandle));

        // Reloading the same slot must not revive the old handle.
        t.insert("OOW", 7);
        let h2 = t.find("OOW").unwrap();
        assert_ne!(h, h2);
        assert_eq!(h.value(&t), None);

        t.compact();
        assert_eq!(h2.value(&t), None);
        assert_eq!(t.find("OOW").unwrap().value(&t), Some(&7));
    }

    /// Invariant: missing keys are an explicit error for handle lookup.
    #[test]
    fn find_missing_key_is_an_error() {
        let t = seeded();
        assert_eq!(
            t.find("nope"),
            Err(TableError::KeyNotFound {
                key: "nope".to_string()
            })
        );
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_missing_key_panics() {
        let t = seeded();
        let _ = t["nope"];
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_mut_missing_key_panics_without_inserting() {
        let mut t = seeded();
        t["nope"] = 1;
    }

    #[test]
    fn index_mut_writes_in_place() {
        let mut t = seeded();
        t.insert("OOW", 103);
        assert_eq!(t["OOW"], 103);
        t["OOW"] = 203;
        assert_eq!(t["OOW"], 203);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: Display lists live buckets by ascending storage index.
    #[test]
    fn display_lists_live_slots() {
        let mut t = colliding(16);
        assert_eq!(t.to_string(), "[]");
        t.insert("a", 1);
        t.insert("b", 2);
        t.insert("c", 3);
        t.remove("b");

        let mut slots: Vec<(usize, &str, i32)> = ["a", "c"]
            .iter()
            .map(|k| (t.find(k).unwrap().slot(), *k, t[*k]))
            .collect();
        slots.sort();
        let expected = format!(
            "[{}: <{}, {}>, {}: <{}, {}>]",
            slots[0].0, slots[0].1, slots[0].2, slots[1].0, slots[1].1, slots[1].2
        );
        assert_eq!(t.to_string(), expected);
    }

    #[test]
    fn debug_shows_tombstones() {
        let mut t = colliding(8);
        t.insert("a", 1);
        t.remove("a");
        let s = format!("{:?}", t);
        assert!(s.contains("tombstones: 1"));
        assert!(s.contains("EAR"));
    }

    /// Invariant: keys/iter follow storage order and agree with each other.
    #[test]
    fn keys_and_iter_agree() {
        let mut t = seeded();
        t.extend([("a", 1), ("b", 2), ("c", 3)]);
        let keys: Vec<&str> = t.keys().collect();
        let pairs: Vec<(&str, i32)> = t.iter().collect();
        assert_eq!(keys, pairs.iter().map(|(k, _)| *k).collect::<Vec<_>>());
        let set: BTreeSet<&str> = keys.into_iter().collect();
        assert_eq!(set, BTreeSet::from(["a", "b", "c"]));

        let total: i32 = (&t).into_iter().map(|(_, v)| v).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn from_iterator_last_value_wins() {
        let t: HashTable = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("a"), Some(3));
    }

    /// Invariant: equal seeds and histories give identical layouts.
    #[test]
    fn seeded_tables_are_reproducible() {
        let build = || {
            let mut t = HashTable::with_seed(8, 77).unwrap();
            for i in 0..40 {
                t.insert(&format!("key-{i}"), i);
            }
            t
        };
        let (a, b) = (build(), build());
        assert_eq!(a.offsets(), b.offsets());
        // Hasher keys differ per table, so compare permutations only.
        assert_eq!(a.capacity(), b.capacity());
    }
}
