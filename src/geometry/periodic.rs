//! Rigid periodic transforms.
//!
//! A periodic interface maps one side onto the other by a rotation about a
//! center followed by a translation:
//!
//! ```text
//! x' = R (x - c) + c + t,    R = Rx(ax) · Ry(ay) · Rz(az)
//! ```
//!
//! Vector quantities only see the rotation `R v`; see
//! [`PeriodicTransform::apply_vector`].

use serde::{Deserialize, Serialize};

type Mat3 = [[f64; 3]; 3];

/// Rotation (angles in radians about x, y, z) plus translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTransform {
    pub rotation_center: [f64; 3],
    pub rotation_angle: [f64; 3],
    pub translation: [f64; 3],
}

impl PeriodicTransform {
    /// Pure translation.
    pub fn translation(t: [f64; 3]) -> Self {
        Self {
            translation: t,
            ..Self::default()
        }
    }

    /// Rotation about `center`, no translation.
    pub fn rotation(center: [f64; 3], angle: [f64; 3]) -> Self {
        Self {
            rotation_center: center,
            rotation_angle: angle,
            translation: [0.0; 3],
        }
    }

    pub fn with_translation(mut self, t: [f64; 3]) -> Self {
        self.translation = t;
        self
    }

    /// `Rx · Ry · Rz`.
    pub fn rotation_matrix(&self) -> Mat3 {
        let [ax, ay, az] = self.rotation_angle;
        let (sx, cx) = ax.sin_cos();
        let (sy, cy) = ay.sin_cos();
        let (sz, cz) = az.sin_cos();
        let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
        let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
        let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];
        matmul(&matmul(&rx, &ry), &rz)
    }

    /// Map a point.
    pub fn apply_point(&self, p: [f64; 3]) -> [f64; 3] {
        let r = self.rotation_matrix();
        let c = self.rotation_center;
        let rel = [p[0] - c[0], p[1] - c[1], p[2] - c[2]];
        let rot = matvec(&r, rel);
        std::array::from_fn(|i| rot[i] + c[i] + self.translation[i])
    }

    /// Rotate a vector. Neither the center nor the translation is applied.
    pub fn apply_vector(&self, v: [f64; 3]) -> [f64; 3] {
        matvec(&self.rotation_matrix(), v)
    }

    /// Map a point back: `x = Rᵀ (x' - c - t) + c`.
    pub fn apply_inverse_point(&self, p: [f64; 3]) -> [f64; 3] {
        let rt = transpose(&self.rotation_matrix());
        let c = self.rotation_center;
        let rel = std::array::from_fn(|i| p[i] - c[i] - self.translation[i]);
        let rot = matvec(&rt, rel);
        std::array::from_fn(|i| rot[i] + c[i])
    }

    pub fn apply_inverse_vector(&self, v: [f64; 3]) -> [f64; 3] {
        matvec(&transpose(&self.rotation_matrix()), v)
    }

    /// Transform applying the inverse map through the forward methods.
    ///
    /// The inverse of a rotation `Rx·Ry·Rz` is not itself of that form, so
    /// this is exposed as a [`RigidMap`] rather than another
    /// `PeriodicTransform`.
    pub fn inverse(&self) -> RigidMap {
        RigidMap {
            transform: *self,
            inverse: true,
        }
    }

    pub fn forward(&self) -> RigidMap {
        RigidMap {
            transform: *self,
            inverse: false,
        }
    }
}

/// A periodic transform applied in one direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidMap {
    transform: PeriodicTransform,
    inverse: bool,
}

impl RigidMap {
    pub fn point(&self, p: [f64; 3]) -> [f64; 3] {
        if self.inverse {
            self.transform.apply_inverse_point(p)
        } else {
            self.transform.apply_point(p)
        }
    }

    pub fn vector(&self, v: [f64; 3]) -> [f64; 3] {
        if self.inverse {
            self.transform.apply_inverse_vector(v)
        } else {
            self.transform.apply_vector(v)
        }
    }
}

fn matmul(a: &Mat3, b: &Mat3) -> Mat3 {
    std::array::from_fn(|i| std::array::from_fn(|j| (0..3).map(|k| a[i][k] * b[k][j]).sum()))
}

fn matvec(a: &Mat3, v: [f64; 3]) -> [f64; 3] {
    std::array::from_fn(|i| a[i][0] * v[0] + a[i][1] * v[1] + a[i][2] * v[2])
}

fn transpose(a: &Mat3) -> Mat3 {
    std::array::from_fn(|i| std::array::from_fn(|j| a[j][i]))
}
