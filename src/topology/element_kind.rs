//! Element kind and grid location metadata.
//!
//! The surgery engine handles a closed set of simplex kinds. Blocks are
//! always stored by decreasing topological dimension, so [`ElementKind`]'s
//! `Ord` follows that storage order (tetrahedra first).

use serde::{Deserialize, Serialize};

/// Standard element kinds handled by the surgery primitives.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ElementKind {
    /// 3D simplex, 4 nodes.
    Tetrahedron,
    /// 2D simplex, 3 nodes.
    Triangle,
    /// 1D segment, 2 nodes.
    Edge,
}

/// Where the entities of a subset or field live.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum GridLocation {
    Vertex,
    EdgeCenter,
    FaceCenter,
    CellCenter,
}

/// One face of an element, in local node numbering.
///
/// `nodes` is oriented so that its normal points away from `opposite`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTemplate {
    pub opposite: usize,
    pub nodes: &'static [usize],
}

const TETRA_FACES: [FaceTemplate; 4] = [
    FaceTemplate { opposite: 3, nodes: &[0, 2, 1] },
    FaceTemplate { opposite: 2, nodes: &[0, 1, 3] },
    FaceTemplate { opposite: 0, nodes: &[1, 2, 3] },
    FaceTemplate { opposite: 1, nodes: &[2, 0, 3] },
];

const TRI_FACES: [FaceTemplate; 3] = [
    FaceTemplate { opposite: 2, nodes: &[0, 1] },
    FaceTemplate { opposite: 0, nodes: &[1, 2] },
    FaceTemplate { opposite: 1, nodes: &[2, 0] },
];

impl ElementKind {
    /// All kinds in storage order (decreasing dimension).
    pub const ALL: [ElementKind; 3] = [
        ElementKind::Tetrahedron,
        ElementKind::Triangle,
        ElementKind::Edge,
    ];

    /// Topological dimension of the element.
    pub fn dimension(self) -> u8 {
        match self {
            ElementKind::Tetrahedron => 3,
            ElementKind::Triangle => 2,
            ElementKind::Edge => 1,
        }
    }

    /// Number of vertices per element.
    pub fn nodes_per_element(self) -> usize {
        match self {
            ElementKind::Tetrahedron => 4,
            ElementKind::Triangle => 3,
            ElementKind::Edge => 2,
        }
    }

    /// Location of subsets listing elements of this kind.
    pub fn location(self) -> GridLocation {
        match self {
            ElementKind::Tetrahedron => GridLocation::CellCenter,
            ElementKind::Triangle => GridLocation::FaceCenter,
            ElementKind::Edge => GridLocation::EdgeCenter,
        }
    }

    /// Kind of the faces bounding this element, if any.
    pub fn face_kind(self) -> Option<ElementKind> {
        match self {
            ElementKind::Tetrahedron => Some(ElementKind::Triangle),
            ElementKind::Triangle => Some(ElementKind::Edge),
            ElementKind::Edge => None,
        }
    }

    /// Static face decomposition table.
    pub fn faces(self) -> &'static [FaceTemplate] {
        match self {
            ElementKind::Tetrahedron => &TETRA_FACES,
            ElementKind::Triangle => &TRI_FACES,
            ElementKind::Edge => &[],
        }
    }

    /// Lower-case tag used in generated patch names (`tetra_4`, `tri_3`, `bar_2`).
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Tetrahedron => "tetra_4",
            ElementKind::Triangle => "tri_3",
            ElementKind::Edge => "bar_2",
        }
    }
}

impl GridLocation {
    /// Element kind whose ids a point list at this location refers to.
    ///
    /// `Vertex` subsets list raw vertex ids and have no element kind.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            GridLocation::Vertex => None,
            GridLocation::EdgeCenter => Some(ElementKind::Edge),
            GridLocation::FaceCenter => Some(ElementKind::Triangle),
            GridLocation::CellCenter => Some(ElementKind::Tetrahedron),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_order_is_decreasing_dimension() {
        let dims: Vec<u8> = ElementKind::ALL.iter().map(|k| k.dimension()).collect();
        assert_eq!(dims, vec![3, 2, 1]);
        assert!(ElementKind::Tetrahedron < ElementKind::Triangle);
        assert!(ElementKind::Triangle < ElementKind::Edge);
    }

    #[test]
    fn face_tables_cover_every_node_but_the_opposite() {
        for kind in ElementKind::ALL {
            for face in kind.faces() {
                assert_eq!(face.nodes.len(), kind.nodes_per_element() - 1);
                assert!(!face.nodes.contains(&face.opposite));
            }
        }
        assert_eq!(ElementKind::Tetrahedron.faces().len(), 4);
    }

    #[test]
    fn location_roundtrip() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.location().element_kind(), Some(kind));
        }
        assert_eq!(GridLocation::Vertex.element_kind(), None);
    }
}
