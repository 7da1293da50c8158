// SPDX-License-Identifier: Apache-2.0

use crate::vec3::Vec3;

/// Unit quaternion stored as `(x, y, z, w)` with `w` as the scalar part.
///
/// Only the rotation-building subset lives here: construction, Hamilton
/// composition, and normalisation. [`crate::Mat4x3`] reads the four
/// components to derive rotation coefficients; it does not renormalise, so
/// callers composing long chains should call [`Quat::normalize`] themselves.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    /// Creates a quaternion from components.
    ///
    /// Callers typically pass unit quaternions; normalisation is not
    /// enforced here.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// X (vector) component.
    pub const fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y (vector) component.
    pub const fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z (vector) component.
    pub const fn z(&self) -> f64 {
        self.data[2]
    }

    /// W (scalar) component.
    pub const fn w(&self) -> f64 {
        self.data[3]
    }

    /// Returns the quaternion as an `(x, y, z, w)` array.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Constructs a quaternion from a rotation axis and angle in radians.
    ///
    /// The axis is normalised internally with no zero-length guard: a zero
    /// axis produces NaN components that propagate into any matrix built
    /// from the result.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let norm_axis = axis.normalize();
        let half = angle * 0.5;
        let (sin_half, cos_half) = half.sin_cos();
        let scaled = norm_axis.scale(sin_half);
        Self::new(scaled.x(), scaled.y(), scaled.z(), cos_half)
    }

    /// Hamilton product of two quaternions (`self * other`).
    ///
    /// Operand order matters: the result composes the rotation represented
    /// by `self` followed by the rotation represented by `other`. When both
    /// operands are unit quaternions the result is a unit quaternion up to
    /// floating-point error.
    pub fn multiply(&self, other: &Self) -> Self {
        let (ax, ay, az, aw) = (self.x(), self.y(), self.z(), self.w());
        let (bx, by, bz, bw) = (other.x(), other.y(), other.z(), other.w());
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Normalises the quaternion.
    ///
    /// A zero-norm input produces NaN components; callers that need to
    /// detect that case test finiteness of the result.
    pub fn normalize(&self) -> Self {
        let inv = 1.0
            / (self.x() * self.x()
                + self.y() * self.y()
                + self.z() * self.z()
                + self.w() * self.w())
            .sqrt();
        Self::new(
            self.x() * inv,
            self.y() * inv,
            self.z() * inv,
            self.w() * inv,
        )
    }
}

/// Converts a 4-element `[f64; 4]` array `(x, y, z, w)` into a `Quat`.
/// The components are taken verbatim; normalisation is not enforced.
impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}
