#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-surgery
//!
//! mesh-surgery edits the connectivity of unstructured tetrahedral zones
//! around periodic interfaces. A periodic interface can be *unrolled* into
//! a plain boundary so that an external volume remesher sees a
//! non-periodic domain, and *folded back* afterwards, restoring the periodic
//! joins on the remeshed zone.
//!
//! ## Layers
//! - [`zone::Zone`]: vertex coordinates, one element block per kind with
//!   contiguous global id ranges, boundary patches, vertex joins and field
//!   containers.
//! - [`algs::subset`]: vertex ↔ element membership queries and patch matching.
//! - [`algs::editor`]: duplication, removal, renumbering and merging
//!   primitives keeping ranges, patches, distributions and fields consistent.
//! - [`algs::periodic`]: the unroll / fold-back orchestrator.
//!
//! Ids are 1-based throughout. Element kinds are numbered in decreasing
//! dimension: tetrahedra, then triangles, then edges.
//!
//! ## Usage
//!
//! ```
//! use mesh_surgery::prelude::*;
//!
//! let mut zone = tetra_box(2, [true, false, false])?;
//! let config = SurgeryConfig::default();
//! let record = unroll_periodic_pairings(&mut zone, &box_pairings([true, false, false]), &config)?;
//! // hand `zone` to the remesher here
//! fold_back(&mut zone, &record, &config)?;
//! assert_eq!(zone.vertex_count(), 27);
//! # Ok::<(), MeshSurgeryError>(())
//! ```
//!
//! Invariant checks run after every orchestrator step in debug builds; the
//! `check-invariants` / `strict-invariants` features keep them in release.

pub mod algs;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;
pub mod zone;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, SelfComm};
    pub use crate::algs::editor::{
        DuplicateRequest, duplicate_elements, merge_two_boundary_patches, remove_elements,
    };
    pub use crate::algs::meshgen::{box_pairings, tetra_box};
    pub use crate::algs::periodic::{
        PairingState, PeriodicPairing, UnrollRecord, fold_back, unroll_periodic_pairings,
    };
    pub use crate::algs::transform::apply_affine_transform;
    pub use crate::config::{SurgeryConfig, TwinMatchPolicy};
    pub use crate::data::coordinates::Coordinates;
    pub use crate::data::field::FieldContainer;
    pub use crate::data::join::VertexJoin;
    pub use crate::data::patch::{Patch, TwinPatch};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::periodic::PeriodicTransform;
    pub use crate::mesh_error::MeshSurgeryError;
    pub use crate::topology::element_kind::{ElementKind, GridLocation};
    pub use crate::topology::vertex_map::{VertexCorrespondence, VertexMap};
    pub use crate::zone::Zone;
}
