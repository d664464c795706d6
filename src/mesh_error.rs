//! MeshSurgeryError: Unified error type for mesh-surgery public APIs
//!
//! Every surgery primitive and the periodic orchestrator report precondition
//! violations through this type instead of panicking or clamping indices.

use thiserror::Error;

use crate::topology::element_kind::{ElementKind, GridLocation};

/// Unified error type for mesh-surgery operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshSurgeryError {
    /// A vertex id is outside `1..=vertex_count`.
    #[error("vertex id {id} out of range (vertex count {vertex_count})")]
    VertexOutOfRange { id: usize, vertex_count: usize },
    /// An element id does not belong to the current range of its block.
    #[error("element id {id} outside the {kind:?} range [{first}, {last}]")]
    ElementOutOfRange {
        kind: ElementKind,
        id: usize,
        first: usize,
        last: usize,
    },
    /// A renumbering map does not cover a referenced vertex.
    #[error("vertex map is not total: old id {old} has no image (map covers {len} ids)")]
    NonTotalVertexMap { old: usize, len: usize },
    /// A range update would leave a negative element count.
    #[error("{kind:?} range would become negative: {count} elements, delta {delta}")]
    NegativeRangeLength {
        kind: ElementKind,
        count: usize,
        delta: isize,
    },
    /// Two element ranges overlap or break the decreasing-dimension order.
    #[error("element ranges out of order: {upper:?} ends at {upper_last}, {lower:?} starts at {lower_first}")]
    RangeOverlap {
        upper: ElementKind,
        upper_last: usize,
        lower: ElementKind,
        lower_first: usize,
    },
    /// Connectivity array length is not a multiple of the nodes per element.
    #[error("{kind:?} connectivity has {len} entries, expected {expected}")]
    ConnectivityLength {
        kind: ElementKind,
        len: usize,
        expected: usize,
    },
    /// Field data length disagrees with the size of its support.
    #[error("field `{container}/{field}` has {found} values, expected {expected}")]
    FieldLengthMismatch {
        container: String,
        field: String,
        expected: usize,
        found: usize,
    },
    /// A boundary patch required by an orchestrated step is absent.
    #[error("boundary patch `{0}` not found")]
    MissingPatch(String),
    /// A vertex join required by a periodic pairing is absent.
    #[error("vertex join `{0}` not found")]
    MissingJoin(String),
    /// A field required by fold-back is absent.
    #[error("field `{container}/{field}` not found")]
    MissingField { container: String, field: String },
    /// A patch with the same name already exists.
    #[error("boundary patch `{0}` already exists")]
    DuplicatePatch(String),
    /// A vertex of a merged patch has no partner in the correspondence.
    #[error("vertex {vertex} of patch `{patch}` has no counterpart in the correspondence")]
    UnmatchedVertex { patch: String, vertex: usize },
    /// More than one twin patch satisfies the containment test.
    #[error("patch `{source_patch}` matches several twin patches: {candidates:?}")]
    AmbiguousTwinPatch {
        source_patch: String,
        candidates: Vec<String>,
    },
    /// An operation was asked to work on a location it does not support.
    #[error("patch `{patch}` has unsupported location {location:?}")]
    InvalidLocation {
        patch: String,
        location: GridLocation,
    },
    /// Geometric input is malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A vertex tag value is not an integral vertex id.
    #[error("vertex tag {value} at vertex {vertex} is not a valid id")]
    InvalidVertexTag { vertex: usize, value: f64 },
    /// The exchange layer received ids outside the distribution it was given.
    #[error("exchange mismatch: {0}")]
    ExchangeMismatch(String),
}
