//! Naming conventions and policies of the periodic unroll / fold-back pass.

use serde::{Deserialize, Serialize};

/// What to do when a source patch has several candidate twins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwinMatchPolicy {
    /// Fail with [`AmbiguousTwinPatch`](crate::mesh_error::MeshSurgeryError::AmbiguousTwinPatch).
    #[default]
    Reject,
    /// Keep the first candidate in declaration order.
    FirstMatch,
}

/// Configuration of a surgery run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeryConfig {
    pub periodic_family: String,
    pub join_family: String,
    pub scratch_prefix: String,
    pub vertex_tag_container: String,
    pub vertex_tag_field: String,
    pub twin_match: TwinMatchPolicy,
    pub keep_bookkeeping_patches: bool,
}

impl Default for SurgeryConfig {
    fn default() -> Self {
        Self {
            periodic_family: "PERIODIC".into(),
            join_family: "GCS".into(),
            scratch_prefix: "remesh_".into(),
            vertex_tag_container: "VertexTag".into(),
            vertex_tag_field: "vtx_tag".into(),
            twin_match: TwinMatchPolicy::Reject,
            keep_bookkeeping_patches: false,
        }
    }
}

impl SurgeryConfig {
    /// Carved cell layer of pairing `i`.
    pub fn carved_cells_name(&self, i: usize) -> String {
        format!("tetra_4_periodic_{i}")
    }

    /// Constraint surface (donor side, stays in place) of pairing `i`.
    pub fn constraint_surface_name(&self, i: usize) -> String {
        format!("tri_3_constraint_{i}")
    }

    /// Duplicated surface (moved with the carved layer) of pairing `i`.
    pub fn periodic_surface_name(&self, i: usize) -> String {
        format!("tri_3_periodic_{i}")
    }

    pub fn constraint_vertices_name(&self, i: usize) -> String {
        format!("vtx_constraint_{i}")
    }

    pub fn periodic_vertices_name(&self, i: usize) -> String {
        format!("vtx_periodic_{i}")
    }

    /// True for patches the remesher introduced as scratch state.
    pub fn is_scratch(&self, name: &str) -> bool {
        !self.scratch_prefix.is_empty() && name.starts_with(&self.scratch_prefix)
    }
}
