#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// bucket-level counters alongside the public surface.

use crate::error::TableError;
use crate::hash_table::{HashTable, MAX_LOAD_FACTOR};
use core::hash::BuildHasher;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    SetViaHandle(usize, i32),
    IndexWrite(usize, i32),
    Iterate,
    Compact,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::SetViaHandle(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::IndexWrite(i, v)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Compact),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against `sut`, mirroring every step in a std HashMap.
// Invariants checked after each op:
// - `insert` returns true iff the key was absent; last write wins.
// - `remove` returns true iff the key was present; absent removes change nothing.
// - `contains`/`get` parity with the model, through any number of tombstones.
// - Handle lookups fail with KeyNotFound exactly when the model lacks the key.
// - `keys()` yields each live key exactly once.
// - `alpha() == size() / capacity()` and stays below the resize threshold.
// - The bucket array's NORMAL/EAR counts match `len()`/`tombstones()`.
fn run_state_machine<S, R>(
    mut sut: HashTable<S, R>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
    R: Rng,
{
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let fresh = sut.insert(k, v);
                let prev = model.insert(k.clone(), v);
                prop_assert_eq!(fresh, prev.is_none());
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::SetViaHandle(i, v) => {
                let k = &pool[i];
                match sut.find(k) {
                    Ok(h) => {
                        let old = sut.set(h, v).expect("fresh handle resolves");
                        let mv = model.get_mut(k).expect("present in model");
                        prop_assert_eq!(old, *mv);
                        *mv = v;
                    }
                    Err(TableError::KeyNotFound { key }) => {
                        prop_assert_eq!(&key, k);
                        prop_assert!(!model.contains_key(k));
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {}", e),
                }
            }
            OpI::IndexWrite(i, v) => {
                let k = &pool[i];
                if let Some(mv) = model.get_mut(k) {
                    sut[k.as_str()] = v;
                    *mv = v;
                }
            }
            OpI::Iterate => {
                let keys: Vec<&str> = sut.keys().collect();
                let s_keys: BTreeSet<&str> = keys.iter().copied().collect();
                prop_assert_eq!(keys.len(), s_keys.len(), "keys are unique");
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Compact => {
                let capacity = sut.capacity();
                sut.compact();
                prop_assert_eq!(sut.capacity(), capacity);
                prop_assert_eq!(sut.tombstones(), 0);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.size(), sut.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.alpha(), sut.size() as f64 / sut.capacity() as f64);
        prop_assert!(sut.alpha() < MAX_LOAD_FACTOR);
        let live = sut.buckets().iter().filter(|b| b.is_normal()).count();
        let dead = sut.buckets().iter().filter(|b| b.is_empty_after_remove()).count();
        prop_assert_eq!(live, sut.len());
        prop_assert_eq!(dead, sut.tombstones());
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(*v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap
// with the default hasher; starts small so the run crosses several resizes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let sut = HashTable::with_seed(2, seed).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares home slot 0,
// so every lookup walks the permutation through live and removed buckets.
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
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let sut = HashTable::with_hasher_and_rng(8, ConstBuildHasher, StdRng::seed_from_u64(seed)).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: every generated permutation pins offset 0 and shuffles 1..n.
proptest! {
    #[test]
    fn prop_offsets_are_permutations(capacity in 2usize..512, seed in any::<u64>()) {
        let p = crate::offsets::ProbeOffsets::generate(capacity, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(p.as_slice()[0], 0);
        let rest: BTreeSet<usize> = p.as_slice()[1..].iter().copied().collect();
        prop_assert_eq!(rest, (1..capacity).collect::<BTreeSet<_>>());
    }
}
