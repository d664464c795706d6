//! Flattened connectivity of one element kind.
//!
//! A block only knows local (0-based) element positions; the global id of a
//! position comes from the zone's [`RangeTable`](crate::topology::range_table::RangeTable).

use hashbrown::HashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data::distribution::Distribution;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::ElementKind;
use crate::topology::vertex_map::VertexMap;

/// All elements of one kind, row-major, 1-based vertex ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBlock {
    kind: ElementKind,
    connectivity: Vec<usize>,
    pub distribution: Distribution,
}

impl ElementBlock {
    pub fn try_new(kind: ElementKind, connectivity: Vec<usize>) -> Result<Self, MeshSurgeryError> {
        let npe = kind.nodes_per_element();
        if connectivity.len() % npe != 0 {
            return Err(MeshSurgeryError::ConnectivityLength {
                kind,
                len: connectivity.len(),
                expected: connectivity.len().div_ceil(npe) * npe,
            });
        }
        let distribution = Distribution::full(connectivity.len() / npe);
        Ok(Self {
            kind,
            connectivity,
            distribution,
        })
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connectivity.len() / self.kind.nodes_per_element()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connectivity.is_empty()
    }

    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }

    /// Vertices of the element at local position `local`.
    #[inline]
    pub fn element(&self, local: usize) -> &[usize] {
        let npe = self.kind.nodes_per_element();
        &self.connectivity[local * npe..(local + 1) * npe]
    }

    pub fn elements(&self) -> impl Iterator<Item = &[usize]> {
        self.connectivity.chunks_exact(self.kind.nodes_per_element())
    }

    /// Concatenated connectivity of the given local elements.
    pub fn gather(&self, locals: &[usize]) -> Vec<usize> {
        locals
            .iter()
            .flat_map(|&l| self.element(l).iter().copied())
            .collect()
    }

    /// Unique sorted vertex ids touched by the given local elements.
    pub fn vertex_ids_of(&self, locals: &[usize]) -> Vec<usize> {
        locals
            .iter()
            .flat_map(|&l| self.element(l).iter().copied())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Local positions of elements touching any (or all) of `vertices`.
    pub fn elements_owning(&self, vertices: &HashSet<usize>, require_all: bool) -> Vec<usize> {
        let test = |elt: &[usize]| {
            if require_all {
                elt.iter().all(|v| vertices.contains(v))
            } else {
                elt.iter().any(|v| vertices.contains(v))
            }
        };
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            self.connectivity
                .par_chunks_exact(self.kind.nodes_per_element())
                .enumerate()
                .filter_map(|(i, elt)| test(elt).then_some(i))
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.elements()
                .enumerate()
                .filter_map(|(i, elt)| test(elt).then_some(i))
                .collect()
        }
    }

    /// Append rows; returns the local position of the first new element.
    pub fn append(&mut self, connectivity: &[usize]) -> Result<usize, MeshSurgeryError> {
        let npe = self.kind.nodes_per_element();
        if connectivity.len() % npe != 0 {
            return Err(MeshSurgeryError::ConnectivityLength {
                kind: self.kind,
                len: connectivity.len(),
                expected: connectivity.len().div_ceil(npe) * npe,
            });
        }
        let first = self.len();
        let added = connectivity.len() / npe;
        self.connectivity.extend_from_slice(connectivity);
        self.distribution.grow(added, added);
        Ok(first)
    }

    /// Remove the elements at the given local positions (any order, duplicates ignored).
    pub fn remove(&mut self, locals: &HashSet<usize>) -> usize {
        let npe = self.kind.nodes_per_element();
        let before = self.len();
        let kept: Vec<usize> = self
            .connectivity
            .chunks_exact(npe)
            .enumerate()
            .filter(|(i, _)| !locals.contains(i))
            .flat_map(|(_, elt)| elt.iter().copied())
            .collect();
        self.connectivity = kept;
        let removed = before - self.len();
        self.distribution.shrink(removed, removed);
        removed
    }

    /// Rewrite vertex references of the given local elements (all when `None`).
    pub fn renumber(
        &mut self,
        map: &VertexMap,
        locals: Option<&[usize]>,
    ) -> Result<(), MeshSurgeryError> {
        match locals {
            None => map.apply_in_place(&mut self.connectivity),
            Some(locals) => {
                let npe = self.kind.nodes_per_element();
                for &l in locals {
                    map.apply_in_place(&mut self.connectivity[l * npe..(l + 1) * npe])?;
                }
                Ok(())
            }
        }
    }
}
