//! Vertex renumbering maps and recorded vertex correspondences.
//!
//! A [`VertexMap`] is a total function over `1..=len`: every old vertex id
//! either has a new id or is explicitly marked removed. Maps built here are
//! permutations, compactions or contractions (several old ids collapsing on
//! one new id), which is all the surgery primitives ever need.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSurgeryError;

/// Total old → new vertex id map; `None` marks a removed vertex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexMap {
    images: Vec<Option<usize>>,
}

impl VertexMap {
    /// Identity over `1..=vertex_count`.
    pub fn identity(vertex_count: usize) -> Self {
        Self {
            images: (1..=vertex_count).map(Some).collect(),
        }
    }

    /// Identity map where each `old[i]` is redirected to `new[i]`.
    pub fn redirect(
        vertex_count: usize,
        old: &[usize],
        new: &[usize],
    ) -> Result<Self, MeshSurgeryError> {
        let mut map = Self::identity(vertex_count);
        for (&o, &n) in old.iter().zip(new) {
            map.set(o, n)?;
        }
        Ok(map)
    }

    /// Compaction that drops `removed` and renumbers survivors contiguously.
    pub fn compaction(vertex_count: usize, removed: &[usize]) -> Result<Self, MeshSurgeryError> {
        let mut images: Vec<Option<usize>> = vec![Some(0); vertex_count];
        for &id in removed {
            check_id(id, vertex_count)?;
            images[id - 1] = None;
        }
        let mut next = 0;
        for image in images.iter_mut().flatten() {
            next += 1;
            *image = next;
        }
        Ok(Self { images })
    }

    /// Contraction collapsing every `sources[i]` onto `targets[i]`.
    ///
    /// Sources are removed from the numbering, the survivors are compacted,
    /// and each source then takes the compacted id of its target.
    pub fn contraction(
        vertex_count: usize,
        sources: &[usize],
        targets: &[usize],
    ) -> Result<Self, MeshSurgeryError> {
        let mut map = Self::compaction(vertex_count, sources)?;
        for (&s, &t) in sources.iter().zip(targets) {
            let image = map.image(t)?;
            map.images[s - 1] = Some(image);
        }
        Ok(map)
    }

    /// Number of old ids covered by the map.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Redirect `old` to `new`.
    pub fn set(&mut self, old: usize, new: usize) -> Result<(), MeshSurgeryError> {
        check_id(old, self.images.len())?;
        self.images[old - 1] = Some(new);
        Ok(())
    }

    /// Image of `old`, `None` when it was removed.
    pub fn get(&self, old: usize) -> Result<Option<usize>, MeshSurgeryError> {
        check_id(old, self.images.len())?;
        Ok(self.images[old - 1])
    }

    /// Image of `old`; a removed vertex is a non-total map error.
    pub fn image(&self, old: usize) -> Result<usize, MeshSurgeryError> {
        self.images
            .get(old.wrapping_sub(1))
            .copied()
            .flatten()
            .ok_or(MeshSurgeryError::NonTotalVertexMap {
                old,
                len: self.images.len(),
            })
    }

    /// Rewrite ids in place. Fails before writing anything if one id has no image.
    pub fn apply_in_place(&self, ids: &mut [usize]) -> Result<(), MeshSurgeryError> {
        let mapped = self.apply(ids)?;
        ids.copy_from_slice(&mapped);
        Ok(())
    }

    /// Mapped copy of `ids`.
    pub fn apply(&self, ids: &[usize]) -> Result<Vec<usize>, MeshSurgeryError> {
        ids.iter().map(|&id| self.image(id)).collect()
    }

    /// Number of distinct surviving new ids (vertex count after applying).
    pub fn image_count(&self) -> usize {
        self.images.iter().flatten().max().copied().unwrap_or(0)
    }
}

fn check_id(id: usize, vertex_count: usize) -> Result<(), MeshSurgeryError> {
    if id == 0 || id > vertex_count {
        return Err(MeshSurgeryError::VertexOutOfRange { id, vertex_count });
    }
    Ok(())
}

/// Pairing `old[i] ↔ new[i]` produced by vertex duplication.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexCorrespondence {
    pub old: Vec<usize>,
    pub new: Vec<usize>,
}

impl VertexCorrespondence {
    pub fn new(old: Vec<usize>, new: Vec<usize>) -> Self {
        debug_assert_eq!(old.len(), new.len());
        Self { old, new }
    }

    pub fn len(&self) -> usize {
        self.old.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_empty()
    }

    /// Keep both sides valid after a renumbering of the zone.
    pub fn remap(&mut self, map: &VertexMap) -> Result<(), MeshSurgeryError> {
        map.apply_in_place(&mut self.old)?;
        map.apply_in_place(&mut self.new)?;
        Ok(())
    }

    /// `old -> new` lookup; the first pair wins for a repeated `old` id.
    pub fn partners(&self) -> HashMap<usize, usize> {
        let mut lookup = HashMap::with_capacity(self.len());
        for (&o, &n) in self.old.iter().zip(&self.new) {
            lookup.entry(o).or_insert(n);
        }
        lookup
    }
}
