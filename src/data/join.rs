//! Vertex-located periodic joins.

use serde::{Deserialize, Serialize};

/// One side of a periodic interface described at vertices.
///
/// `point_list[i]` on this side is the periodic image of
/// `point_list_donor[i]` on the opposite side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexJoin {
    pub point_list: Vec<usize>,
    pub point_list_donor: Vec<usize>,
}

impl VertexJoin {
    pub fn new(point_list: Vec<usize>, point_list_donor: Vec<usize>) -> Self {
        debug_assert_eq!(point_list.len(), point_list_donor.len());
        Self {
            point_list,
            point_list_donor,
        }
    }

    pub fn len(&self) -> usize {
        self.point_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_list.is_empty()
    }
}
