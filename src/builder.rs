//! TableBuilder: configuration for a [`HashTable`].
//!
//! ```
//! use perm_hashtable::HashTable;
//!
//! let mut t = HashTable::builder().capacity(32).seed(7).build().unwrap();
//! assert!(t.insert("CAR", 101));
//! assert_eq!(t.capacity(), 32);
//! ```

use crate::error::TableError;
use crate::hash_table::{HashTable, DEFAULT_CAPACITY};
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct TableBuilder<S = DefaultHashBuilder, R = StdRng> {
    capacity: usize,
    hasher: S,
    rng: R,
}

impl TableBuilder {
    /// Default capacity, default hasher, OS-seeded generator.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hasher: DefaultHashBuilder::default(),
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, R> TableBuilder<S, R> {
    /// Initial number of buckets; validated by [`build`](Self::build).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn hasher<S2>(self, hasher: S2) -> TableBuilder<S2, R> {
        TableBuilder {
            capacity: self.capacity,
            hasher,
            rng: self.rng,
        }
    }

    /// Generator used for every probe permutation the table creates.
    pub fn rng<R2>(self, rng: R2) -> TableBuilder<S, R2> {
        TableBuilder {
            capacity: self.capacity,
            hasher: self.hasher,
            rng,
        }
    }

    /// Reseeds the current generator type deterministically.
    pub fn seed(mut self, seed: u64) -> Self
    where
        R: SeedableRng,
    {
        self.rng = R::seed_from_u64(seed);
        self
    }
}

impl<S, R> TableBuilder<S, R>
where
    S: BuildHasher,
    R: Rng,
{
    pub fn build(self) -> Result<HashTable<S, R>, TableError> {
        HashTable::with_hasher_and_rng(self.capacity, self.hasher, self.rng)
    }
}
