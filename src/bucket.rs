//! Bucket: a single storage slot and its three-state lifecycle.
//!
//! ```text
//!   EmptySinceStart --load--> Normal --mark_removed--> EmptyAfterRemove
//!                               ^  \__set_value__/            |
//!                               |______________load___________|
//! ```
//!
//! Buckets never probe; the table decides which bucket to touch.

use core::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum State {
    Normal {
        key: String,
        value: i32,
    },
    #[default]
    EmptySinceStart,
    EmptyAfterRemove,
}

#[derive(Clone, Debug, Default)]
pub struct Bucket {
    state: State,
    // Bumped on every load so handles to a previous occupant never resolve.
    generation: u32,
}

impl Bucket {
    /// A fresh bucket, empty since start.
    pub const fn new() -> Self {
        Self {
            state: State::EmptySinceStart,
            generation: 0,
        }
    }

    /// True for either empty kind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !matches!(self.state, State::Normal { .. })
    }

    /// Probe-termination signal: nothing was ever stored here, so no key
    /// can have been displaced past this slot.
    #[inline]
    pub fn is_empty_since_start(&self) -> bool {
        matches!(self.state, State::EmptySinceStart)
    }

    /// Tombstone. Does not terminate a probe.
    #[inline]
    pub fn is_empty_after_remove(&self) -> bool {
        matches!(self.state, State::EmptyAfterRemove)
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        !self.is_empty()
    }

    /// Stores `key`/`value` and makes the bucket NORMAL. Used for fresh
    /// inserts, tombstone reuse, and rehash transfers alike.
    pub fn load(&mut self, key: String, value: i32) {
        debug_assert!(self.is_empty(), "load over a live entry");
        self.state = State::Normal { key, value };
        self.generation = self.generation.wrapping_add(1);
    }

    /// Overwrites the value of a NORMAL bucket in place. Returns the old
    /// value, or `None` (and does nothing) if the bucket is empty.
    pub fn set_value(&mut self, value: i32) -> Option<i32> {
        match &mut self.state {
            State::Normal { value: v, .. } => Some(core::mem::replace(v, value)),
            _ => None,
        }
    }

    /// NORMAL -> EMPTY_AFTER_REMOVE, handing back the evicted pair.
    /// Empty buckets are left untouched.
    pub fn mark_removed(&mut self) -> Option<(String, i32)> {
        if self.is_empty() {
            return None;
        }
        match core::mem::replace(&mut self.state, State::EmptyAfterRemove) {
            State::Normal { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// Consumes the bucket, yielding its pair if NORMAL. Used when
    /// transferring entries into a rebuilt array.
    pub(crate) fn into_entry(self) -> Option<(String, i32)> {
        match self.state {
            State::Normal { key, value } => Some((key, value)),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match &self.state {
            State::Normal { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&i32> {
        match &self.state {
            State::Normal { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut i32> {
        match &mut self.state {
            State::Normal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Key/value pair of a NORMAL bucket.
    pub fn entry(&self) -> Option<(&str, i32)> {
        match &self.state {
            State::Normal { key, value } => Some((key, *value)),
            _ => None,
        }
    }

    /// Exact string equality against the stored key; always false when empty.
    #[inline]
    pub fn holds(&self, key: &str) -> bool {
        matches!(&self.state, State::Normal { key: k, .. } if k == key)
    }

    #[inline]
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Normal { key, value } => write!(f, "<{}, {}>", key, value),
            State::EmptySinceStart => f.write_str("ESS"),
            State::EmptyAfterRemove => f.write_str("EAR"),
        }
    }
}
