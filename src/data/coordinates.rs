//! Vertex coordinate storage.
//!
//! Coordinates are kept as three component arrays (`x`, `y`, `z`) indexed by
//! `vertex_id - 1`, which is the layout the external tree container uses.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSurgeryError;

/// Structure-of-arrays vertex coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl Coordinates {
    /// Build from a list of points.
    pub fn from_points(points: &[[f64; 3]]) -> Self {
        let mut coords = Self::default();
        for p in points {
            coords.push(*p);
        }
        coords
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Component arrays `[x, y, z]`.
    pub fn components(&self) -> [&[f64]; 3] {
        [&self.x, &self.y, &self.z]
    }

    pub fn components_mut(&mut self) -> [&mut Vec<f64>; 3] {
        [&mut self.x, &mut self.y, &mut self.z]
    }

    /// Position of a 1-based vertex.
    pub fn try_get(&self, vertex: usize) -> Result<[f64; 3], MeshSurgeryError> {
        let i = self.index(vertex)?;
        Ok([self.x[i], self.y[i], self.z[i]])
    }

    /// Overwrite the position of a 1-based vertex.
    pub fn try_set(&mut self, vertex: usize, p: [f64; 3]) -> Result<(), MeshSurgeryError> {
        let i = self.index(vertex)?;
        self.x[i] = p[0];
        self.y[i] = p[1];
        self.z[i] = p[2];
        Ok(())
    }

    pub fn push(&mut self, p: [f64; 3]) {
        self.x.push(p[0]);
        self.y.push(p[1]);
        self.z.push(p[2]);
    }

    /// All positions, in vertex order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        (0..self.len()).map(|i| [self.x[i], self.y[i], self.z[i]])
    }

    fn index(&self, vertex: usize) -> Result<usize, MeshSurgeryError> {
        if vertex == 0 || vertex > self.len() {
            return Err(MeshSurgeryError::VertexOutOfRange {
                id: vertex,
                vertex_count: self.len(),
            });
        }
        Ok(vertex - 1)
    }
}
