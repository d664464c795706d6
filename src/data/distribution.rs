//! Per-entity distribution records.
//!
//! A distribution tells which slice `[start, end)` of a globally numbered
//! entity set the current participant owns, and the global total. Every
//! primitive that adds or drops vertices, elements or subset entries updates
//! the matching record so the exchange layer keeps seeing consistent sizes.

use serde::{Deserialize, Serialize};

/// Local block `[start, end)` of a global set of `total` entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl Distribution {
    pub fn new(start: usize, end: usize, total: usize) -> Self {
        debug_assert!(start <= end && end <= total);
        Self { start, end, total }
    }

    /// Whole set owned locally.
    pub fn full(total: usize) -> Self {
        Self::new(0, total, total)
    }

    /// Number of locally owned entities.
    #[inline]
    pub fn local_len(&self) -> usize {
        self.end - self.start
    }

    /// Append `local` entities here, `global` entities overall.
    pub fn grow(&mut self, local: usize, global: usize) {
        self.end += local;
        self.total += global;
    }

    /// Drop `local` entities here, `global` entities overall.
    pub fn shrink(&mut self, local: usize, global: usize) {
        debug_assert!(local <= self.local_len() && global <= self.total);
        self.end -= local;
        self.total -= global;
    }
}
