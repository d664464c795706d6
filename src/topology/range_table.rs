//! Global element numbering shared by all blocks of a zone.
//!
//! Element ids are 1-based and contiguous per kind. Blocks are numbered in
//! decreasing dimension: tetrahedra take `1..=n_tet`, triangles follow, edges
//! come last. Any change to one block's size moves every lower-dimensional
//! range by the same signed delta; [`RangeTable::shift_ranges_below`] is the
//! single place where that happens.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::ElementKind;

/// Inclusive 1-based range `[first, last]`; empty when `last + 1 == first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRange {
    pub first: usize,
    pub last: usize,
}

impl ElementRange {
    /// Range of `count` elements starting at `first`.
    pub fn with_len(first: usize, count: usize) -> Self {
        Self {
            first,
            last: first + count - 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        id >= self.first && id <= self.last
    }

    /// 0-based position of a global id inside the range.
    #[inline]
    pub fn local(&self, id: usize) -> Option<usize> {
        self.contains(id).then(|| id - self.first)
    }

    /// Global id of a 0-based position (not bounds checked).
    #[inline]
    pub fn global(&self, local: usize) -> usize {
        self.first + local
    }

    fn shifted(self, delta: isize) -> Self {
        Self {
            first: self.first.saturating_add_signed(delta),
            last: self.last.saturating_add_signed(delta),
        }
    }
}

/// Ordered table of element ranges, one entry per present kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTable {
    entries: Vec<(ElementKind, ElementRange)>,
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build consecutive ranges from per-kind element counts.
    ///
    /// Counts are sorted into storage order first, so the caller's order
    /// does not matter.
    pub fn from_counts(counts: &[(ElementKind, usize)]) -> Self {
        let mut sorted = counts.to_vec();
        sorted.sort_by_key(|(kind, _)| *kind);
        let mut next = 1;
        let entries = sorted
            .into_iter()
            .map(|(kind, count)| {
                let range = ElementRange::with_len(next, count);
                next += count;
                (kind, range)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, kind: ElementKind) -> Option<ElementRange> {
        self.entries
            .iter()
            .find_map(|(k, r)| (*k == kind).then_some(*r))
    }

    pub fn contains_kind(&self, kind: ElementKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, ElementRange)> + '_ {
        self.entries.iter().copied()
    }

    /// Register a new kind with `count` elements, placed in storage order.
    ///
    /// Lower-dimensional ranges move up by `count`.
    pub fn insert_kind(&mut self, kind: ElementKind, count: usize) {
        if self.contains_kind(kind) {
            return;
        }
        let first = self
            .entries
            .iter()
            .filter(|(k, _)| *k < kind)
            .map(|(_, r)| r.last + 1)
            .max()
            .unwrap_or(1);
        self.shift_ranges_below(kind.dimension(), count as isize);
        self.entries.push((kind, ElementRange::with_len(first, count)));
        self.entries.sort_by_key(|(k, _)| *k);
    }

    /// Grow (or shrink) one kind's range by `delta` elements and shift every
    /// lower-dimensional range accordingly.
    pub fn resize(&mut self, kind: ElementKind, delta: isize) -> Result<(), MeshSurgeryError> {
        let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) else {
            return Ok(());
        };
        let count = entry.1.len();
        let new_len = count as isize + delta;
        if new_len < 0 {
            return Err(MeshSurgeryError::NegativeRangeLength { kind, count, delta });
        }
        entry.1.last = (entry.1.first + new_len as usize) - 1;
        self.shift_ranges_below(kind.dimension(), delta);
        Ok(())
    }

    /// Move every range of dimension strictly below `dimension` by `delta`.
    pub fn shift_ranges_below(&mut self, dimension: u8, delta: isize) {
        if delta == 0 {
            return;
        }
        for (kind, range) in &mut self.entries {
            if kind.dimension() < dimension {
                *range = range.shifted(delta);
            }
        }
        log::debug!("shifted element ranges below dim {dimension} by {delta}");
    }

    /// Check that ranges start at 1, are contiguous and never overlap.
    pub fn validate(&self) -> Result<(), MeshSurgeryError> {
        for pair in self.entries.windows(2) {
            let (upper, ur) = pair[0];
            let (lower, lr) = pair[1];
            if upper >= lower || ur.last >= lr.first {
                return Err(MeshSurgeryError::RangeOverlap {
                    upper,
                    upper_last: ur.last,
                    lower,
                    lower_first: lr.first,
                });
            }
        }
        Ok(())
    }
}
