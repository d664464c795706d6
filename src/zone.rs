//! Indexed element store: one mesh zone.
//!
//! A [`Zone`] owns the vertex coordinates, one [`ElementBlock`] per element
//! kind, the [`RangeTable`] numbering those blocks, boundary patches, vertex
//! joins and field containers. Everything the surgery primitives mutate goes
//! through this type so that the range-shift invariant has a single owner:
//! whenever a block grows or shrinks, [`Zone::resize_block`] moves every
//! lower-dimensional range *and* every point list that refers to it.

use std::collections::BTreeMap;

use hashbrown::HashSet;

use crate::algs::communicator::SelfComm;
use crate::algs::exchange::uniform_distribution;
use crate::data::coordinates::Coordinates;
use crate::data::distribution::Distribution;
use crate::data::field::FieldContainer;
use crate::data::join::VertexJoin;
use crate::data::patch::{Patch, PatchSet};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_block::ElementBlock;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::topology::range_table::{ElementRange, RangeTable};

/// One unstructured mesh zone.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub name: String,
    pub(crate) coordinates: Coordinates,
    pub vertex_distribution: Distribution,
    pub(crate) blocks: BTreeMap<ElementKind, ElementBlock>,
    pub(crate) ranges: RangeTable,
    pub patches: PatchSet,
    pub joins: BTreeMap<String, VertexJoin>,
    pub fields: BTreeMap<String, FieldContainer>,
}

impl Zone {
    /// Zone with vertices only.
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        let vertex_distribution = uniform_distribution(coordinates.len(), &SelfComm);
        Self {
            name: name.into(),
            coordinates,
            vertex_distribution,
            blocks: BTreeMap::new(),
            ranges: RangeTable::new(),
            patches: PatchSet::new(),
            joins: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    // --- builders -------------------------------------------------------

    /// Add elements of `kind`; returns the global ids they received.
    ///
    /// A kind already present is extended at the end of its range.
    pub fn add_block(
        &mut self,
        kind: ElementKind,
        connectivity: Vec<usize>,
    ) -> Result<ElementRange, MeshSurgeryError> {
        if self.blocks.contains_key(&kind) {
            return self.append_elements(kind, &connectivity);
        }
        let block = ElementBlock::try_new(kind, connectivity)?;
        if let Some(bad) = block.connectivity().iter().find(|&&v| v == 0 || v > self.vertex_count()) {
            return Err(MeshSurgeryError::VertexOutOfRange {
                id: *bad,
                vertex_count: self.vertex_count(),
            });
        }
        let count = block.len();
        self.ranges.insert_kind(kind, count);
        self.shift_lower_point_lists(kind, count as isize);
        self.blocks.insert(kind, block);
        self.range(kind).ok_or_else(|| MeshSurgeryError::InvalidLocation {
            patch: self.name.clone(),
            location: kind.location(),
        })
    }

    pub fn add_patch(&mut self, name: impl Into<String>, patch: Patch) -> Result<(), MeshSurgeryError> {
        self.patches.insert(name, patch)
    }

    pub fn add_join(&mut self, name: impl Into<String>, join: VertexJoin) {
        self.joins.insert(name.into(), join);
    }

    pub fn add_field_container(&mut self, name: impl Into<String>, container: FieldContainer) {
        self.fields.insert(name.into(), container);
    }

    // --- accessors ------------------------------------------------------

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn block(&self, kind: ElementKind) -> Option<&ElementBlock> {
        self.blocks.get(&kind)
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    pub fn range(&self, kind: ElementKind) -> Option<ElementRange> {
        self.ranges.get(kind)
    }

    /// Element count of `kind` (0 when absent).
    pub fn element_count(&self, kind: ElementKind) -> usize {
        self.blocks.get(&kind).map_or(0, ElementBlock::len)
    }

    /// Highest-dimensional kind present.
    pub fn cell_kind(&self) -> Option<ElementKind> {
        self.blocks.keys().next().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cell_kind().map_or(0, |k| self.element_count(k))
    }

    pub fn patch(&self, name: &str) -> Option<&Patch> {
        self.patches.get(name)
    }

    /// Point list of a patch, or `MissingPatch`.
    pub fn patch_point_list(&self, name: &str) -> Result<&[usize], MeshSurgeryError> {
        self.patches
            .get(name)
            .map(|p| p.point_list.as_slice())
            .ok_or_else(|| MeshSurgeryError::MissingPatch(name.to_string()))
    }

    pub fn join(&self, name: &str) -> Result<&VertexJoin, MeshSurgeryError> {
        self.joins
            .get(name)
            .ok_or_else(|| MeshSurgeryError::MissingJoin(name.to_string()))
    }

    /// Field containers at `location`.
    pub fn fields_at(&self, location: GridLocation) -> impl Iterator<Item = (&str, &FieldContainer)> {
        self.fields
            .iter()
            .filter(move |(_, fc)| fc.location == location)
            .map(|(n, fc)| (n.as_str(), fc))
    }

    // --- queries --------------------------------------------------------

    /// 0-based block positions of global element ids.
    pub fn local_ids(&self, kind: ElementKind, ids: &[usize]) -> Result<Vec<usize>, MeshSurgeryError> {
        let Some(range) = self.range(kind) else {
            return Ok(Vec::new());
        };
        ids.iter()
            .map(|&id| {
                range.local(id).ok_or(MeshSurgeryError::ElementOutOfRange {
                    kind,
                    id,
                    first: range.first,
                    last: range.last,
                })
            })
            .collect()
    }

    /// Global ids of 0-based block positions.
    pub fn global_ids(&self, kind: ElementKind, locals: &[usize]) -> Vec<usize> {
        match self.range(kind) {
            Some(range) => locals.iter().map(|&l| range.global(l)).collect(),
            None => Vec::new(),
        }
    }

    /// Unique sorted vertices of the given elements; empty for an absent kind.
    pub fn vertex_ids_of(&self, kind: ElementKind, ids: &[usize]) -> Result<Vec<usize>, MeshSurgeryError> {
        let Some(block) = self.blocks.get(&kind) else {
            return Ok(Vec::new());
        };
        let locals = self.local_ids(kind, ids)?;
        Ok(block.vertex_ids_of(&locals))
    }

    /// Global ids of `kind` elements touching any of `vertex_ids`, or with
    /// `require_all`, elements whose vertices all lie in `vertex_ids`.
    pub fn elements_owning(&self, vertex_ids: &[usize], kind: ElementKind, require_all: bool) -> Vec<usize> {
        let Some(block) = self.blocks.get(&kind) else {
            return Vec::new();
        };
        let set: HashSet<usize> = vertex_ids.iter().copied().collect();
        let locals = block.elements_owning(&set, require_all);
        self.global_ids(kind, &locals)
    }

    /// Concatenated connectivity of global element ids.
    pub fn connectivity_of(&self, kind: ElementKind, ids: &[usize]) -> Result<Vec<usize>, MeshSurgeryError> {
        let Some(block) = self.blocks.get(&kind) else {
            return Ok(Vec::new());
        };
        let locals = self.local_ids(kind, ids)?;
        Ok(block.gather(&locals))
    }

    // --- range bookkeeping ------------------------------------------------

    /// Append elements to an existing block; returns their global ids.
    pub(crate) fn append_elements(
        &mut self,
        kind: ElementKind,
        connectivity: &[usize],
    ) -> Result<ElementRange, MeshSurgeryError> {
        let vertex_count = self.vertex_count();
        if let Some(bad) = connectivity.iter().find(|&&v| v == 0 || v > vertex_count) {
            return Err(MeshSurgeryError::VertexOutOfRange { id: *bad, vertex_count });
        }
        let Some(block) = self.blocks.get_mut(&kind) else {
            return self.add_block(kind, connectivity.to_vec());
        };
        let first_local = block.append(connectivity)?;
        let added = block.len() - first_local;
        self.resize_block(kind, added as isize)?;
        let range = self.range(kind).ok_or_else(|| MeshSurgeryError::InvalidLocation {
            patch: self.name.clone(),
            location: kind.location(),
        })?;
        Ok(ElementRange::with_len(range.global(first_local), added))
    }

    /// Resize the range of `kind` and shift every lower-dimensional range,
    /// patch point list and point-list field container by `delta`.
    pub(crate) fn resize_block(&mut self, kind: ElementKind, delta: isize) -> Result<(), MeshSurgeryError> {
        self.ranges.resize(kind, delta)?;
        self.shift_lower_point_lists(kind, delta);
        Ok(())
    }

    fn shift_lower_point_lists(&mut self, kind: ElementKind, delta: isize) {
        if delta == 0 {
            return;
        }
        let below = |loc: GridLocation| {
            loc.element_kind()
                .is_some_and(|k| k.dimension() < kind.dimension())
        };
        for (_, patch) in self.patches.iter_mut() {
            if below(patch.location) {
                for id in &mut patch.point_list {
                    *id = id.saturating_add_signed(delta);
                }
            }
        }
        for fc in self.fields.values_mut() {
            if let (true, Some(pl)) = (below(fc.location), fc.point_list.as_mut()) {
                for id in pl {
                    *id = id.saturating_add_signed(delta);
                }
            }
        }
    }
}

impl DebugInvariants for Zone {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Zone invariants failed");
    }

    fn validate_invariants(&self) -> Result<(), MeshSurgeryError> {
        self.ranges.validate()?;
        let vertex_count = self.vertex_count();
        if self.vertex_distribution.total != vertex_count {
            return Err(MeshSurgeryError::ExchangeMismatch(format!(
                "vertex distribution total {} != vertex count {vertex_count}",
                self.vertex_distribution.total
            )));
        }

        for (&kind, block) in &self.blocks {
            let range = self.ranges.get(kind).ok_or_else(|| MeshSurgeryError::InvalidLocation {
                patch: self.name.clone(),
                location: kind.location(),
            })?;
            if range.len() != block.len() || block.distribution.total != block.len() {
                return Err(MeshSurgeryError::ConnectivityLength {
                    kind,
                    len: block.connectivity().len(),
                    expected: range.len() * kind.nodes_per_element(),
                });
            }
            if let Some(&id) = block.connectivity().iter().find(|&&v| v == 0 || v > vertex_count) {
                return Err(MeshSurgeryError::VertexOutOfRange { id, vertex_count });
            }
        }

        for (name, patch) in self.patches.iter() {
            check_point_list(self, name, patch.location, &patch.point_list)?;
            if patch.distribution.total != patch.len() {
                return Err(MeshSurgeryError::ExchangeMismatch(format!(
                    "patch `{name}` distribution total {} != length {}",
                    patch.distribution.total,
                    patch.len()
                )));
            }
        }

        for (name, join) in &self.joins {
            check_point_list(self, name, GridLocation::Vertex, &join.point_list)?;
            check_point_list(self, name, GridLocation::Vertex, &join.point_list_donor)?;
        }

        for (cname, fc) in &self.fields {
            let expected = match (&fc.point_list, fc.location) {
                (Some(pl), loc) => {
                    check_point_list(self, cname, loc, pl)?;
                    pl.len()
                }
                (None, GridLocation::Vertex) => vertex_count,
                (None, loc) => loc.element_kind().map_or(0, |k| self.element_count(k)),
            };
            for (field, values) in fc.iter() {
                if values.len() != expected {
                    return Err(MeshSurgeryError::FieldLengthMismatch {
                        container: cname.clone(),
                        field: field.to_string(),
                        expected,
                        found: values.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_point_list(
    zone: &Zone,
    name: &str,
    location: GridLocation,
    point_list: &[usize],
) -> Result<(), MeshSurgeryError> {
    match location.element_kind() {
        None => {
            let vertex_count = zone.vertex_count();
            match point_list.iter().find(|&&v| v == 0 || v > vertex_count) {
                Some(&id) => Err(MeshSurgeryError::VertexOutOfRange { id, vertex_count }),
                None => Ok(()),
            }
        }
        Some(kind) => {
            if point_list.is_empty() {
                return Ok(());
            }
            let range = zone.range(kind).ok_or_else(|| MeshSurgeryError::InvalidLocation {
                patch: name.to_string(),
                location,
            })?;
            match point_list.iter().find(|&&id| !range.contains(id)) {
                Some(&id) => Err(MeshSurgeryError::ElementOutOfRange {
                    kind,
                    id,
                    first: range.first,
                    last: range.last,
                }),
                None => Ok(()),
            }
        }
    }
}
