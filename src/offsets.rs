//! Probe-offset permutation.
//!
//! A table of capacity `n` owns one `ProbeOffsets` of length `n`. Slot
//! `p` of a key's probe sequence is `(home + offsets[p]) % n`. Index 0 is
//! pinned to offset 0 so the first probe is always the home slot; indices
//! `1..n` hold a shuffle of `1..n`, so a full walk visits every slot once.

use crate::error::TableError;
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOffsets {
    offsets: Vec<usize>,
}

impl ProbeOffsets {
    /// Shuffles `1..capacity` with draws from `rng`, leaving index 0 fixed.
    pub fn generate<R>(capacity: usize, rng: &mut R) -> Result<Self, TableError>
    where
        R: Rng,
    {
        if capacity < 2 {
            return Err(TableError::InvalidCapacity { capacity });
        }
        Ok(Self::shuffled(capacity, rng))
    }

    /// `generate` for a capacity the caller has already validated.
    pub(crate) fn shuffled<R>(capacity: usize, rng: &mut R) -> Self
    where
        R: Rng,
    {
        debug_assert!(capacity >= 2);
        let mut offsets: Vec<usize> = (0..capacity).collect();
        for i in 1..capacity {
            let j = rng.random_range(1..capacity);
            offsets.swap(i, j);
        }
        Self { offsets }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }

    /// Slot indices visited for a key whose home slot is `home`.
    #[inline]
    pub fn probe(&self, home: usize) -> Probe<'_> {
        debug_assert!(home < self.offsets.len());
        Probe {
            offsets: self.offsets.iter(),
            home,
            capacity: self.offsets.len(),
        }
    }
}

/// Iterator over one probe sequence. Yields exactly `capacity` slots.
#[derive(Clone, Debug)]
pub struct Probe<'a> {
    offsets: core::slice::Iter<'a, usize>,
    home: usize,
    capacity: usize,
}

impl Iterator for Probe<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.offsets
            .next()
            .map(|&off| (self.home + off) % self.capacity)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl ExactSizeIterator for Probe<'_> {}
