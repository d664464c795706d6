//! Pairing descriptions, unroll records and the per-pairing state machine.

use serde::{Deserialize, Serialize};

use crate::data::patch::TwinPatch;
use crate::geometry::periodic::PeriodicTransform;
use crate::topology::vertex_map::VertexCorrespondence;

/// Two vertex joins describing the sides of one periodic interface.
///
/// `transform` moves the second side onto the first. The first join's
/// point list and donor list give the vertex-to-vertex correspondence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodicPairing {
    pub first_join: String,
    pub second_join: String,
    pub transform: PeriodicTransform,
}

impl PeriodicPairing {
    pub fn new(
        first_join: impl Into<String>,
        second_join: impl Into<String>,
        transform: PeriodicTransform,
    ) -> Self {
        Self {
            first_join: first_join.into(),
            second_join: second_join.into(),
            transform,
        }
    }
}

/// What the unroll pass did for one pairing, as needed by fold-back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub index: usize,
    pub pairing: PeriodicPairing,
    /// Constraint-surface vertices (`old`) and their duplicates on the
    /// periodic surface (`new`), in the numbering at the end of the unroll.
    pub correspondence: VertexCorrespondence,
    /// Edge patches removed on the second side, with the patch they were
    /// matched to on the first side.
    pub twins: Vec<TwinPatch>,
    /// Family of the second side's face patch.
    pub donor_family: Option<String>,
}

/// Result of [`unroll_periodic_pairings`](super::unroll_periodic_pairings).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnrollRecord {
    pub pairings: Vec<PairingRecord>,
    /// Face patches created from vertex joins.
    pub converted_patches: Vec<String>,
}

/// Progress of one pairing through the unroll sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PairingState {
    #[default]
    Idle,
    SurfaceCarved,
    LinesPruned,
    SurfaceDuplicated,
    TransformApplied,
    Merged,
    Done,
}

impl PairingState {
    /// The state that follows; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::SurfaceCarved,
            Self::SurfaceCarved => Self::LinesPruned,
            Self::LinesPruned => Self::SurfaceDuplicated,
            Self::SurfaceDuplicated => Self::TransformApplied,
            Self::TransformApplied => Self::Merged,
            Self::Merged | Self::Done => Self::Done,
        }
    }
}

/// Drives one pairing through [`PairingState`] in order.
#[derive(Debug)]
pub struct PairingRun {
    index: usize,
    state: PairingState,
}

impl PairingRun {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: PairingState::Idle,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PairingState {
        self.state
    }

    /// Step to the next state.
    pub fn advance(&mut self) -> PairingState {
        let next = self.state.next();
        log::info!("pairing {}: {:?} -> {:?}", self.index, self.state, next);
        self.state = next;
        next
    }
}
