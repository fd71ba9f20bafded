//! perm-hashtable: an open-addressing map from `String` keys to `i32`
//! values whose collisions are resolved by walking a randomized offset
//! permutation instead of linear or quadratic steps.
//!
//! Internal Design:
//!
//! Summary
//! - Layers, leaves first:
//!   - `Bucket`: one slot with a three-state lifecycle (NORMAL,
//!     EMPTY_SINCE_START, EMPTY_AFTER_REMOVE). Never probes.
//!   - `ProbeOffsets`: per-capacity permutation; `offsets[0] == 0` and
//!     `offsets[1..]` is a shuffle of `1..capacity`.
//!   - `HashTable`: owns the bucket array and the permutation; every
//!     operation walks `(home + offsets[p]) % capacity`.
//!
//! Probing and tombstones
//! - Lookups stop at a matching key or at the first EMPTY_SINCE_START;
//!   tombstones are walked through, because a key may have been placed
//!   past a slot that was vacated later.
//! - Inserts make one walk that both detects a live duplicate and
//!   remembers the first vacant bucket, so tombstones get reused without
//!   ever shadowing an existing key.
//! - Removal never moves other entries.
//!
//! Growth
//! - Once `len / capacity` reaches 0.5 the table doubles, draws a new
//!   permutation, and re-places every live entry in storage order. The new
//!   bucket array and permutation replace the old ones as a unit.
//! - `compact()` performs the same rebuild at the current capacity to shed
//!   accumulated tombstones. There is no shrink policy.
//!
//! Randomness
//! - The permutation generator is an explicit `rand::Rng` owned by the
//!   table and reused for every rebuild. Seed it through
//!   `HashTable::with_seed` or `TableBuilder::seed` for reproducible
//!   permutations.
//!
//! Index access
//! - `find` returns a `Copy` [`Handle`] or `TableError::KeyNotFound`.
//!   Handles carry the bucket generation and table epoch, so they stop
//!   resolving after removal or a rebuild instead of aliasing another entry.
//! - `table[key]` panics on a missing key and never inserts.
//!
//! Constraints
//! - Single-threaded; no interior mutability and no locking.
//! - Keys compare by exact string equality.
//!
//! ```
//! use perm_hashtable::HashTable;
//!
//! let mut t = HashTable::new();
//! assert!(t.insert("CAR", 101));
//! assert!(t.contains("CAR"));
//! assert!(t.remove("CAR"));
//! assert_eq!(t.get("CAR"), None);
//!
//! t.insert("OOW", 103);
//! t["OOW"] = 203;
//! assert_eq!(t["OOW"], 203);
//! ```

pub mod bucket;
mod builder;
mod error;
pub mod hash_table;
mod hash_table_proptest;
pub mod offsets;

// Public surface
pub use builder::TableBuilder;
pub use error::TableError;
pub use hash_table::{Handle, HashTable, DEFAULT_CAPACITY, MAX_LOAD_FACTOR};
