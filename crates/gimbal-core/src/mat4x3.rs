// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::properties::Properties;
use crate::quat::Quat;
use crate::scalar::{abs_equals_one, fma};
use crate::vec3::Vec3;

/// Flag set carried by matrices that are exactly the identity.
const IDENTITY_PROPS: Properties = Properties::IDENTITY
    .union(Properties::TRANSLATION)
    .union(Properties::ORTHONORMAL);

/// Flag set carried by pure-translation matrices (linear part identity).
const TRANSLATION_PROPS: Properties = Properties::TRANSLATION.union(Properties::ORTHONORMAL);

/// Errors raised by the row/column accessors for out-of-range indices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The row index was not in `0..=2`.
    #[error("row index {0} out of range (0..=2)")]
    Row(usize),
    /// The column index was not in `0..=3`.
    #[error("column index {0} out of range (0..=3)")]
    Column(usize),
}

/// Column-major 4x3 affine transformation matrix in double precision.
///
/// Twelve scalars represent a 3x3 linear part (`m00..m22`, field `mCR` holding
/// column `C`, row `R`) plus a translation column (`m30..m32`); there is no
/// projective row, so the matrix can encode rotation, scale, shear, and
/// translation but never a perspective divide.
///
/// Every instance carries a [`Properties`] bitset summarising known algebraic
/// structure. Mutating operations consult the flags of their operands to pick
/// the cheapest correct algorithm and conservatively recompute the
/// destination's flags; [`Mat4x3::determine_properties`] is the only place
/// flags are promoted from raw scalars.
///
/// In-place mutators return `&mut Self` so transforms chain fluently. Since
/// the receiver is both operand and destination, each operation reads every
/// field it still needs into locals before the first write; callers never
/// observe partially written state mid-operation.
///
/// # Examples
/// Basic transformations:
/// ```
/// use gimbal_core::{Mat4x3, Vec3};
/// let t = Mat4x3::translation(5.0, -3.0, 2.0);
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
///
/// # Precision
/// Generic composition funnels through fused multiply-add, so each result
/// term accumulates at most one rounding. Degenerate inputs (singular
/// inversion, zero-length axes) produce NaN/Infinity without raising errors;
/// callers that care test finiteness via [`Mat4x3::is_finite`].
#[derive(Debug, Copy, Clone)]
pub struct Mat4x3 {
    m00: f64,
    m01: f64,
    m02: f64,
    m10: f64,
    m11: f64,
    m12: f64,
    m20: f64,
    m21: f64,
    m22: f64,
    m30: f64,
    m31: f64,
    m32: f64,
    properties: Properties,
}

impl Mat4x3 {
    const fn from_parts(m: [f64; 12], properties: Properties) -> Self {
        Self {
            m00: m[0],
            m01: m[1],
            m02: m[2],
            m10: m[3],
            m11: m[4],
            m12: m[5],
            m20: m[6],
            m21: m[7],
            m22: m[8],
            m30: m[9],
            m31: m[10],
            m32: m[11],
            properties,
        }
    }

    fn has(&self, flags: Properties) -> bool {
        self.properties.intersects(flags)
    }

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::from_parts(
            [
                1.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, // col 1
                0.0, 0.0, 1.0, // col 2
                0.0, 0.0, 0.0, // translation
            ],
            IDENTITY_PROPS,
        )
    }

    /// Creates a matrix from twelve explicit scalars in column-major order.
    ///
    /// Flags are computed by full inspection of the supplied values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
        m30: f64,
        m31: f64,
        m32: f64,
    ) -> Self {
        Self::from([
            m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32,
        ])
    }

    /// Builds a pure translation matrix.
    pub const fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_parts(
            [
                1.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, // col 1
                0.0, 0.0, 1.0, // col 2
                x, y, z, // translation
            ],
            TRANSLATION_PROPS,
        )
    }

    /// Builds a non-uniform scale matrix.
    ///
    /// The result is flagged orthonormal only when all three factors are
    /// bit-exactly `±1.0` (axis flips carry no scale or shear).
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        let one = abs_equals_one(x) && abs_equals_one(y) && abs_equals_one(z);
        Self::from_parts(
            [x, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, z, 0.0, 0.0, 0.0],
            if one {
                Properties::ORTHONORMAL
            } else {
                Properties::NONE
            },
        )
    }

    /// Builds a rotation around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_parts(
            [1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c, 0.0, 0.0, 0.0],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a rotation around the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_parts(
            [c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c, 0.0, 0.0, 0.0],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a rotation around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_parts(
            [c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a rotation of `angle` radians around an arbitrary unit axis.
    ///
    /// Axis-aligned unit axes (`(±1,0,0)`, `(0,±1,0)`, `(0,0,±1)`, detected
    /// with an exact bit test) route to the cheaper single-axis formulas;
    /// anything else takes the general Rodrigues form. The axis must be unit
    /// length; a non-unit axis skews the result and a zero axis produces
    /// NaNs downstream of the caller's own normalisation.
    pub fn rotation_axis(angle: f64, axis: Vec3) -> Self {
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        if y == 0.0 && z == 0.0 && abs_equals_one(x) {
            return Self::rotation_x(x * angle);
        }
        if x == 0.0 && z == 0.0 && abs_equals_one(y) {
            return Self::rotation_y(y * angle);
        }
        if x == 0.0 && y == 0.0 && abs_equals_one(z) {
            return Self::rotation_z(z * angle);
        }
        let rm = axis_rotation_coeffs(angle, x, y, z);
        Self::from_parts(
            [
                rm[0], rm[1], rm[2], rm[3], rm[4], rm[5], rm[6], rm[7], rm[8], 0.0, 0.0, 0.0,
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a rotation matrix from a unit quaternion.
    ///
    /// The components are read verbatim; pass a normalised quaternion.
    pub fn from_quat(q: &Quat) -> Self {
        let rm = quat_rotation_coeffs(q);
        Self::from_parts(
            [
                rm[0], rm[1], rm[2], rm[3], rm[4], rm[5], rm[6], rm[7], rm[8], 0.0, 0.0, 0.0,
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a right-handed look-at view transform.
    ///
    /// The camera sits at `eye` looking towards `center` with `up` roughly
    /// upwards; the camera looks down its local `-Z`.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let dir = eye.sub(&center).normalize();
        Self::look_at_basis(eye, dir, up)
    }

    /// Builds a left-handed look-at view transform (camera looks down `+Z`).
    pub fn look_at_lh(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let dir = center.sub(&eye).normalize();
        Self::look_at_basis(eye, dir, up)
    }

    fn look_at_basis(eye: Vec3, dir: Vec3, up: Vec3) -> Self {
        let left = up.cross(&dir).normalize();
        let upn = dir.cross(&left);
        Self::from_parts(
            [
                left.x(),
                upn.x(),
                dir.x(),
                left.y(),
                upn.y(),
                dir.y(),
                left.z(),
                upn.z(),
                dir.z(),
                -left.dot(&eye),
                -upn.dot(&eye),
                -dir.dot(&eye),
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds the rotation-only part of a right-handed look-at: orient the
    /// local `-Z` axis along `dir` with `up` roughly upwards.
    pub fn look_along(dir: Vec3, up: Vec3) -> Self {
        let ndir = dir.normalize().scale(-1.0);
        let left = up.cross(&ndir).normalize();
        let upn = ndir.cross(&left);
        Self::from_parts(
            [
                left.x(),
                upn.x(),
                ndir.x(),
                left.y(),
                upn.y(),
                ndir.y(),
                left.z(),
                upn.z(),
                ndir.z(),
                0.0,
                0.0,
                0.0,
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds an orthographic projection for the given clipping planes.
    ///
    /// `z_zero_to_one` selects the NDC depth convention: `false` maps
    /// `[z_near, z_far]` onto `[-1, 1]`, `true` onto `[0, 1]`. Using the
    /// wrong convention produces a plausible but incorrect projection, so
    /// callers must match their rasteriser's expectation exactly.
    pub fn ortho(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
        z_zero_to_one: bool,
    ) -> Self {
        let rm00 = 2.0 / (right - left);
        let rm11 = 2.0 / (top - bottom);
        let rm22 = (if z_zero_to_one { 1.0 } else { 2.0 }) / (z_near - z_far);
        let rm30 = (left + right) / (left - right);
        let rm31 = (bottom + top) / (bottom - top);
        let rm32 = (if z_zero_to_one { z_near } else { z_far + z_near }) / (z_near - z_far);
        Self::from_parts(
            [
                rm00, 0.0, 0.0, 0.0, rm11, 0.0, 0.0, 0.0, rm22, rm30, rm31, rm32,
            ],
            Properties::NONE,
        )
    }

    /// Builds a symmetric orthographic projection (`width` by `height`
    /// centred on the view axis).
    pub fn ortho_symmetric(
        width: f64,
        height: f64,
        z_near: f64,
        z_far: f64,
        z_zero_to_one: bool,
    ) -> Self {
        let rm22 = (if z_zero_to_one { 1.0 } else { 2.0 }) / (z_near - z_far);
        let rm32 = (if z_zero_to_one { z_near } else { z_far + z_near }) / (z_near - z_far);
        Self::from_parts(
            [
                2.0 / width,
                0.0,
                0.0,
                0.0,
                2.0 / height,
                0.0,
                0.0,
                0.0,
                rm22,
                0.0,
                0.0,
                rm32,
            ],
            Properties::NONE,
        )
    }

    /// Builds a 2D orthographic projection (Z is negated, depth untouched).
    pub fn ortho_2d(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self::from_parts(
            [
                2.0 / (right - left),
                0.0,
                0.0,
                0.0,
                2.0 / (top - bottom),
                0.0,
                0.0,
                0.0,
                -1.0,
                (left + right) / (left - right),
                (bottom + top) / (bottom - top),
                0.0,
            ],
            Properties::NONE,
        )
    }

    /// Builds a reflection about the plane `ax + by + cz + d = 0`.
    ///
    /// The plane normal `(a, b, c)` must be unit length.
    pub fn reflection(a: f64, b: f64, c: f64, d: f64) -> Self {
        let da = a + a;
        let db = b + b;
        let dc = c + c;
        let dd = d + d;
        Self::from_parts(
            [
                1.0 - da * a,
                -da * b,
                -da * c,
                -db * a,
                1.0 - db * b,
                -db * c,
                -dc * a,
                -dc * b,
                1.0 - dc * c,
                -dd * a,
                -dd * b,
                -dd * c,
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a reflection about the plane through `point` with the given
    /// normal (normalised internally; a zero normal yields NaNs).
    pub fn reflection_about(normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalize();
        Self::reflection(n.x(), n.y(), n.z(), -n.dot(&point))
    }

    /// Builds a cylindrical billboard: rotate around the fixed `up` axis so
    /// the local `+Z` faces `target_pos` as closely as the constraint allows,
    /// positioned at `obj_pos`. `up` must be unit length.
    pub fn billboard_cylindrical(obj_pos: Vec3, target_pos: Vec3, up: Vec3) -> Self {
        let to_target = target_pos.sub(&obj_pos);
        let dir = to_target.sub(&up.scale(to_target.dot(&up))).normalize();
        let left = up.cross(&dir).normalize();
        Self::from_parts(
            [
                left.x(),
                left.y(),
                left.z(),
                up.x(),
                up.y(),
                up.z(),
                dir.x(),
                dir.y(),
                dir.z(),
                obj_pos.x(),
                obj_pos.y(),
                obj_pos.z(),
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a spherical billboard: orient the local `+Z` at `target_pos`
    /// keeping `up` (unit length) roughly upwards, positioned at `obj_pos`.
    pub fn billboard_spherical(obj_pos: Vec3, target_pos: Vec3, up: Vec3) -> Self {
        let dir = target_pos.sub(&obj_pos).normalize();
        let left = up.cross(&dir).normalize();
        let upn = dir.cross(&left);
        Self::from_parts(
            [
                left.x(),
                left.y(),
                left.z(),
                upn.x(),
                upn.y(),
                upn.z(),
                dir.x(),
                dir.y(),
                dir.z(),
                obj_pos.x(),
                obj_pos.y(),
                obj_pos.z(),
            ],
            Properties::ORTHONORMAL,
        )
    }

    /// Builds a spherical billboard using the shortest arc from `+Z` to the
    /// target direction, with no up constraint (the roll is whatever the
    /// shortest-arc quaternion produces).
    pub fn billboard_spherical_shortest(obj_pos: Vec3, target_pos: Vec3) -> Self {
        let to_dir = target_pos.sub(&obj_pos);
        let q = Quat::new(
            -to_dir.y(),
            to_dir.x(),
            0.0,
            to_dir.length() + to_dir.z(),
        )
        .normalize();
        let mut dest = Self::from_quat(&q);
        dest.m30 = obj_pos.x();
        dest.m31 = obj_pos.y();
        dest.m32 = obj_pos.z();
        dest
    }

    /// Known structure flags of this matrix.
    pub const fn properties(&self) -> Properties {
        self.properties
    }

    /// Recomputes the property flags by full inspection of the raw scalars.
    ///
    /// The comparison is bit-exact on purpose — an epsilon here would change
    /// which fast paths later operations may legally take. This is the only
    /// operation allowed to promote flags; everything else only propagates
    /// or clears them algebraically.
    pub fn determine_properties(&mut self) -> &mut Self {
        let mut properties = Properties::NONE;
        if self.m00 == 1.0
            && self.m01 == 0.0
            && self.m02 == 0.0
            && self.m10 == 0.0
            && self.m11 == 1.0
            && self.m12 == 0.0
            && self.m20 == 0.0
            && self.m21 == 0.0
            && self.m22 == 1.0
        {
            properties |= TRANSLATION_PROPS;
            if self.m30 == 0.0 && self.m31 == 0.0 && self.m32 == 0.0 {
                properties |= Properties::IDENTITY;
            }
        }
        self.properties = properties;
        self
    }

    /// Returns the matrix as a column-major `[f64; 12]` array.
    pub fn to_array(self) -> [f64; 12] {
        [
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22, self.m30, self.m31, self.m32,
        ]
    }

    /// Determinant of the 3x3 linear part.
    pub fn determinant(&self) -> f64 {
        (self.m00 * self.m11 - self.m01 * self.m10) * self.m22
            + (self.m02 * self.m10 - self.m00 * self.m12) * self.m21
            + (self.m01 * self.m12 - self.m02 * self.m11) * self.m20
    }

    /// Returns `true` when all twelve scalars are finite.
    ///
    /// Degenerate operations (singular inversion, zero-axis normalisation)
    /// signal failure by producing non-finite values instead of errors; this
    /// is the check callers use to detect them.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }

    /// Row `r` of the matrix as `[x, y, z, translation]`, `r ∈ 0..=2`.
    pub fn row(&self, r: usize) -> Result<[f64; 4], AccessError> {
        match r {
            0 => Ok([self.m00, self.m10, self.m20, self.m30]),
            1 => Ok([self.m01, self.m11, self.m21, self.m31]),
            2 => Ok([self.m02, self.m12, self.m22, self.m32]),
            _ => Err(AccessError::Row(r)),
        }
    }

    /// Column `c` of the matrix, `c ∈ 0..=3` (column 3 is the translation).
    pub fn column(&self, c: usize) -> Result<Vec3, AccessError> {
        match c {
            0 => Ok(Vec3::new(self.m00, self.m01, self.m02)),
            1 => Ok(Vec3::new(self.m10, self.m11, self.m12)),
            2 => Ok(Vec3::new(self.m20, self.m21, self.m22)),
            3 => Ok(Vec3::new(self.m30, self.m31, self.m32)),
            _ => Err(AccessError::Column(c)),
        }
    }

    /// Overwrites row `r` with `[x, y, z, translation]` components.
    ///
    /// Raw writes carry no structure, so all flags are cleared.
    pub fn set_row(&mut self, r: usize, row: [f64; 4]) -> Result<&mut Self, AccessError> {
        match r {
            0 => {
                self.m00 = row[0];
                self.m10 = row[1];
                self.m20 = row[2];
                self.m30 = row[3];
            }
            1 => {
                self.m01 = row[0];
                self.m11 = row[1];
                self.m21 = row[2];
                self.m31 = row[3];
            }
            2 => {
                self.m02 = row[0];
                self.m12 = row[1];
                self.m22 = row[2];
                self.m32 = row[3];
            }
            _ => return Err(AccessError::Row(r)),
        }
        self.properties = Properties::NONE;
        Ok(self)
    }

    /// Overwrites column `c`; all flags are cleared.
    pub fn set_column(&mut self, c: usize, column: Vec3) -> Result<&mut Self, AccessError> {
        match c {
            0 => {
                self.m00 = column.x();
                self.m01 = column.y();
                self.m02 = column.z();
            }
            1 => {
                self.m10 = column.x();
                self.m11 = column.y();
                self.m12 = column.z();
            }
            2 => {
                self.m20 = column.x();
                self.m21 = column.y();
                self.m22 = column.z();
            }
            3 => {
                self.m30 = column.x();
                self.m31 = column.y();
                self.m32 = column.z();
            }
            _ => return Err(AccessError::Column(c)),
        }
        self.properties = Properties::NONE;
        Ok(self)
    }

    /// Resets this matrix to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// Overwrites only the translation column, leaving the linear part
    /// untouched. The identity flag is cleared; translation-only and
    /// orthonormal structure survive because the linear part is unchanged.
    pub fn set_translation(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.m30 = x;
        self.m31 = y;
        self.m32 = z;
        self.properties &= !Properties::IDENTITY;
        self
    }

    /// Transforms a point (implicit `w = 1`; translation applies).
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        let (x, y, z) = (point.x(), point.y(), point.z());
        Vec3::new(
            fma(self.m00, x, fma(self.m10, y, fma(self.m20, z, self.m30))),
            fma(self.m01, x, fma(self.m11, y, fma(self.m21, z, self.m31))),
            fma(self.m02, x, fma(self.m12, y, fma(self.m22, z, self.m32))),
        )
    }

    /// Transforms a direction (implicit `w = 0`; translation is ignored).
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        let (x, y, z) = (direction.x(), direction.y(), direction.z());
        Vec3::new(
            fma(self.m00, x, fma(self.m10, y, self.m20 * z)),
            fma(self.m01, x, fma(self.m11, y, self.m21 * z)),
            fma(self.m02, x, fma(self.m12, y, self.m22 * z)),
        )
    }

    /// Multiplies this matrix by `right` in place (`self = self * right`).
    ///
    /// Under the matrix-times-column-vector convention the right operand is
    /// applied to vectors first. Dispatch, in fixed precedence order:
    ///
    /// 1. `self` identity — copy `right` (bit-for-bit, no arithmetic);
    /// 2. `right` identity — leave `self` untouched;
    /// 3. `self` pure translation — adopt `right`'s linear part and sum the
    ///    translation columns;
    /// 4. otherwise the general FMA product.
    ///
    /// # Examples
    /// ```
    /// use gimbal_core::Mat4x3;
    /// let mut m = Mat4x3::translation(1.0, 2.0, 3.0);
    /// m.mul(&Mat4x3::translation(4.0, 5.0, 6.0));
    /// assert_eq!(m.to_array()[9..], [5.0, 7.0, 9.0]);
    /// ```
    pub fn mul(&mut self, right: &Self) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = *right;
            self
        } else if right.has(Properties::IDENTITY) {
            self
        } else if self.has(Properties::TRANSLATION) {
            self.mul_translation(right)
        } else {
            self.mul_generic(right)
        }
    }

    fn mul_translation(&mut self, right: &Self) -> &mut Self {
        self.m00 = right.m00;
        self.m01 = right.m01;
        self.m02 = right.m02;
        self.m10 = right.m10;
        self.m11 = right.m11;
        self.m12 = right.m12;
        self.m20 = right.m20;
        self.m21 = right.m21;
        self.m22 = right.m22;
        self.m30 += right.m30;
        self.m31 += right.m31;
        self.m32 += right.m32;
        // The result's linear part is right's, so right's own structure
        // flags carry over; identity cannot (the summed translation).
        self.properties = right.properties & TRANSLATION_PROPS;
        self
    }

    fn mul_generic(&mut self, right: &Self) -> &mut Self {
        let nm00 = fma(self.m00, right.m00, fma(self.m10, right.m01, self.m20 * right.m02));
        let nm01 = fma(self.m01, right.m00, fma(self.m11, right.m01, self.m21 * right.m02));
        let nm02 = fma(self.m02, right.m00, fma(self.m12, right.m01, self.m22 * right.m02));
        let nm10 = fma(self.m00, right.m10, fma(self.m10, right.m11, self.m20 * right.m12));
        let nm11 = fma(self.m01, right.m10, fma(self.m11, right.m11, self.m21 * right.m12));
        let nm12 = fma(self.m02, right.m10, fma(self.m12, right.m11, self.m22 * right.m12));
        let nm20 = fma(self.m00, right.m20, fma(self.m10, right.m21, self.m20 * right.m22));
        let nm21 = fma(self.m01, right.m20, fma(self.m11, right.m21, self.m21 * right.m22));
        let nm22 = fma(self.m02, right.m20, fma(self.m12, right.m21, self.m22 * right.m22));
        let nm30 = fma(
            self.m00,
            right.m30,
            fma(self.m10, right.m31, fma(self.m20, right.m32, self.m30)),
        );
        let nm31 = fma(
            self.m01,
            right.m30,
            fma(self.m11, right.m31, fma(self.m21, right.m32, self.m31)),
        );
        let nm32 = fma(
            self.m02,
            right.m30,
            fma(self.m12, right.m31, fma(self.m22, right.m32, self.m32)),
        );
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.m20 = nm20;
        self.m21 = nm21;
        self.m22 = nm22;
        self.m30 = nm30;
        self.m31 = nm31;
        self.m32 = nm32;
        // Translation/identity cannot survive a generic product; orthonormal
        // survives exactly when both factors were orthonormal.
        self.properties = self.properties & right.properties & Properties::ORTHONORMAL;
        self
    }

    /// Inverts this matrix in place.
    ///
    /// Identity inverts to itself; orthonormal matrices take the closed form
    /// (transposed linear part, `t' = -Rᵀt`) and stay flagged orthonormal;
    /// everything else takes the general cofactor inverse with a single
    /// division by the determinant. A singular matrix produces Infinity/NaN
    /// components — no error is raised; callers that need to detect
    /// degeneracy test [`Mat4x3::is_finite`] afterwards.
    pub fn invert(&mut self) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            self
        } else if self.has(Properties::ORTHONORMAL) {
            self.invert_orthonormal()
        } else {
            self.invert_generic()
        }
    }

    fn invert_orthonormal(&mut self) -> &mut Self {
        let nm30 = -(self.m00 * self.m30 + self.m01 * self.m31 + self.m02 * self.m32);
        let nm31 = -(self.m10 * self.m30 + self.m11 * self.m31 + self.m12 * self.m32);
        let nm32 = -(self.m20 * self.m30 + self.m21 * self.m31 + self.m22 * self.m32);
        let m01 = self.m01;
        let m02 = self.m02;
        let m12 = self.m12;
        self.m01 = self.m10;
        self.m02 = self.m20;
        self.m12 = self.m21;
        self.m10 = m01;
        self.m20 = m02;
        self.m21 = m12;
        self.m30 = nm30;
        self.m31 = nm31;
        self.m32 = nm32;
        self.properties = Properties::ORTHONORMAL;
        self
    }

    fn invert_generic(&mut self) -> &mut Self {
        let s = 1.0 / self.determinant();
        let nm00 = (self.m11 * self.m22 - self.m21 * self.m12) * s;
        let nm01 = (self.m21 * self.m02 - self.m01 * self.m22) * s;
        let nm02 = (self.m01 * self.m12 - self.m11 * self.m02) * s;
        let nm10 = (self.m20 * self.m12 - self.m10 * self.m22) * s;
        let nm11 = (self.m00 * self.m22 - self.m20 * self.m02) * s;
        let nm12 = (self.m10 * self.m02 - self.m00 * self.m12) * s;
        let nm20 = (self.m10 * self.m21 - self.m20 * self.m11) * s;
        let nm21 = (self.m20 * self.m01 - self.m00 * self.m21) * s;
        let nm22 = (self.m00 * self.m11 - self.m10 * self.m01) * s;
        let nm30 = -(nm00 * self.m30 + nm10 * self.m31 + nm20 * self.m32);
        let nm31 = -(nm01 * self.m30 + nm11 * self.m31 + nm21 * self.m32);
        let nm32 = -(nm02 * self.m30 + nm12 * self.m31 + nm22 * self.m32);
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.m20 = nm20;
        self.m21 = nm21;
        self.m22 = nm22;
        self.m30 = nm30;
        self.m31 = nm31;
        self.m32 = nm32;
        self.properties = Properties::NONE;
        self
    }

    /// Applies a translation after this transform (`self = self * T`).
    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::translation(x, y, z);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            self.m30 += x;
            self.m31 += y;
            self.m32 += z;
        } else {
            let nm30 = fma(self.m00, x, fma(self.m10, y, fma(self.m20, z, self.m30)));
            let nm31 = fma(self.m01, x, fma(self.m11, y, fma(self.m21, z, self.m31)));
            let nm32 = fma(self.m02, x, fma(self.m12, y, fma(self.m22, z, self.m32)));
            self.m30 = nm30;
            self.m31 = nm31;
            self.m32 = nm32;
        }
        self.properties &= !Properties::IDENTITY;
        self
    }

    /// Applies a translation before this transform (`self = T * self`).
    pub fn translate_local(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::translation(x, y, z);
            return self;
        }
        self.m30 += x;
        self.m31 += y;
        self.m32 += z;
        self.properties &= !Properties::IDENTITY;
        self
    }

    /// Applies a scale after this transform (`self = self * S`).
    ///
    /// Scaling destroys every structure flag (the conservative summary does
    /// not chase the `±1` case through composition).
    pub fn scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::scaling(x, y, z);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            // Linear part is identity: the product is diag(x, y, z) with the
            // old translation carried along.
            self.m00 = x;
            self.m11 = y;
            self.m22 = z;
        } else {
            self.m00 *= x;
            self.m01 *= x;
            self.m02 *= x;
            self.m10 *= y;
            self.m11 *= y;
            self.m12 *= y;
            self.m20 *= z;
            self.m21 *= z;
            self.m22 *= z;
        }
        self.properties = Properties::NONE;
        self
    }

    /// Applies a scale before this transform (`self = S * self`), scaling
    /// each row — translation included.
    pub fn scale_local(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::scaling(x, y, z);
            return self;
        }
        self.m00 *= x;
        self.m10 *= x;
        self.m20 *= x;
        self.m30 *= x;
        self.m01 *= y;
        self.m11 *= y;
        self.m21 *= y;
        self.m31 *= y;
        self.m02 *= z;
        self.m12 *= z;
        self.m22 *= z;
        self.m32 *= z;
        self.properties = Properties::NONE;
        self
    }

    /// Applies a rotation around X after this transform (`self = self * Rx`).
    pub fn rotate_x(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_x(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation(&Self::rotation_x(angle));
        }
        let (s, c) = angle.sin_cos();
        // col1' = c*col1 + s*col2; col2' = -s*col1 + c*col2. The old col1 is
        // still needed for col2', so it is staged in locals first.
        let nm10 = fma(self.m10, c, self.m20 * s);
        let nm11 = fma(self.m11, c, self.m21 * s);
        let nm12 = fma(self.m12, c, self.m22 * s);
        self.m20 = fma(self.m10, -s, self.m20 * c);
        self.m21 = fma(self.m11, -s, self.m21 * c);
        self.m22 = fma(self.m12, -s, self.m22 * c);
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation around Y after this transform (`self = self * Ry`).
    pub fn rotate_y(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_y(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation(&Self::rotation_y(angle));
        }
        let (s, c) = angle.sin_cos();
        // col0' = c*col0 - s*col2; col2' = s*col0 + c*col2
        let nm00 = fma(self.m20, -s, self.m00 * c);
        let nm01 = fma(self.m21, -s, self.m01 * c);
        let nm02 = fma(self.m22, -s, self.m02 * c);
        self.m20 = fma(self.m00, s, self.m20 * c);
        self.m21 = fma(self.m01, s, self.m21 * c);
        self.m22 = fma(self.m02, s, self.m22 * c);
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation around Z after this transform (`self = self * Rz`).
    pub fn rotate_z(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_z(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation(&Self::rotation_z(angle));
        }
        let (s, c) = angle.sin_cos();
        // col0' = c*col0 + s*col1; col1' = -s*col0 + c*col1
        let nm00 = fma(self.m00, c, self.m10 * s);
        let nm01 = fma(self.m01, c, self.m11 * s);
        let nm02 = fma(self.m02, c, self.m12 * s);
        self.m10 = fma(self.m00, -s, self.m10 * c);
        self.m11 = fma(self.m01, -s, self.m11 * c);
        self.m12 = fma(self.m02, -s, self.m12 * c);
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation around X before this transform (`self = Rx * self`).
    pub fn rotate_local_x(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_x(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation_of_translation(&Self::rotation_x(angle));
        }
        let (s, c) = angle.sin_cos();
        // Every column, translation included: row1' = c*row1 - s*row2,
        // row2' = s*row1 + c*row2.
        let nm01 = fma(self.m01, c, self.m02 * -s);
        let nm11 = fma(self.m11, c, self.m12 * -s);
        let nm21 = fma(self.m21, c, self.m22 * -s);
        let nm31 = fma(self.m31, c, self.m32 * -s);
        self.m02 = fma(self.m01, s, self.m02 * c);
        self.m12 = fma(self.m11, s, self.m12 * c);
        self.m22 = fma(self.m21, s, self.m22 * c);
        self.m32 = fma(self.m31, s, self.m32 * c);
        self.m01 = nm01;
        self.m11 = nm11;
        self.m21 = nm21;
        self.m31 = nm31;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation around Y before this transform (`self = Ry * self`).
    pub fn rotate_local_y(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_y(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation_of_translation(&Self::rotation_y(angle));
        }
        let (s, c) = angle.sin_cos();
        // row0' = c*row0 + s*row2, row2' = -s*row0 + c*row2
        let nm00 = fma(self.m00, c, self.m02 * s);
        let nm10 = fma(self.m10, c, self.m12 * s);
        let nm20 = fma(self.m20, c, self.m22 * s);
        let nm30 = fma(self.m30, c, self.m32 * s);
        self.m02 = fma(self.m00, -s, self.m02 * c);
        self.m12 = fma(self.m10, -s, self.m12 * c);
        self.m22 = fma(self.m20, -s, self.m22 * c);
        self.m32 = fma(self.m30, -s, self.m32 * c);
        self.m00 = nm00;
        self.m10 = nm10;
        self.m20 = nm20;
        self.m30 = nm30;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation around Z before this transform (`self = Rz * self`).
    pub fn rotate_local_z(&mut self, angle: f64) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_z(angle);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation_of_translation(&Self::rotation_z(angle));
        }
        let (s, c) = angle.sin_cos();
        // row0' = c*row0 - s*row1, row1' = s*row0 + c*row1
        let nm00 = fma(self.m00, c, self.m01 * -s);
        let nm10 = fma(self.m10, c, self.m11 * -s);
        let nm20 = fma(self.m20, c, self.m21 * -s);
        let nm30 = fma(self.m30, c, self.m31 * -s);
        self.m01 = fma(self.m00, s, self.m01 * c);
        self.m11 = fma(self.m10, s, self.m11 * c);
        self.m21 = fma(self.m20, s, self.m21 * c);
        self.m31 = fma(self.m30, s, self.m31 * c);
        self.m00 = nm00;
        self.m10 = nm10;
        self.m20 = nm20;
        self.m30 = nm30;
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation of `angle` radians around a unit `axis` after this
    /// transform (`self = self * R`).
    ///
    /// Axis-aligned unit axes route to the single-axis fast paths; the two
    /// paths agree up to floating rounding for matching inputs.
    pub fn rotate_axis(&mut self, angle: f64, axis: Vec3) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_axis(angle, axis);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation(&Self::rotation_axis(angle, axis));
        }
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        if y == 0.0 && z == 0.0 && abs_equals_one(x) {
            return self.rotate_x(x * angle);
        }
        if x == 0.0 && z == 0.0 && abs_equals_one(y) {
            return self.rotate_y(y * angle);
        }
        if x == 0.0 && y == 0.0 && abs_equals_one(z) {
            return self.rotate_z(z * angle);
        }
        let rm = axis_rotation_coeffs(angle, x, y, z);
        self.post_multiply_linear(&rm);
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies a rotation of `angle` radians around a unit `axis` before
    /// this transform (`self = R * self`).
    pub fn rotate_local_axis(&mut self, angle: f64, axis: Vec3) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::rotation_axis(angle, axis);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation_of_translation(&Self::rotation_axis(angle, axis));
        }
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        if y == 0.0 && z == 0.0 && abs_equals_one(x) {
            return self.rotate_local_x(x * angle);
        }
        if x == 0.0 && z == 0.0 && abs_equals_one(y) {
            return self.rotate_local_y(y * angle);
        }
        if x == 0.0 && y == 0.0 && abs_equals_one(z) {
            return self.rotate_local_z(z * angle);
        }
        let rm = axis_rotation_coeffs(angle, x, y, z);
        self.pre_multiply_linear(&rm);
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies the rotation of a unit quaternion after this transform
    /// (`self = self * R(q)`).
    pub fn rotate_quat(&mut self, q: &Quat) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::from_quat(q);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation(&Self::from_quat(q));
        }
        let rm = quat_rotation_coeffs(q);
        self.post_multiply_linear(&rm);
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies the rotation of a unit quaternion before this transform
    /// (`self = R(q) * self`).
    pub fn rotate_local_quat(&mut self, q: &Quat) -> &mut Self {
        if self.has(Properties::IDENTITY) {
            *self = Self::from_quat(q);
            return self;
        }
        if self.has(Properties::TRANSLATION) {
            return self.adopt_rotation_of_translation(&Self::from_quat(q));
        }
        let rm = quat_rotation_coeffs(q);
        self.pre_multiply_linear(&rm);
        self.properties &= !(Properties::IDENTITY | Properties::TRANSLATION);
        self
    }

    /// Applies an orthographic projection after this transform.
    ///
    /// See [`Mat4x3::ortho`] for the parameter and depth-range conventions.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_ortho(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
        z_zero_to_one: bool,
    ) -> &mut Self {
        self.mul(&Self::ortho(
            left,
            right,
            bottom,
            top,
            z_near,
            z_far,
            z_zero_to_one,
        ))
    }

    /// Applies a symmetric orthographic projection after this transform.
    pub fn apply_ortho_symmetric(
        &mut self,
        width: f64,
        height: f64,
        z_near: f64,
        z_far: f64,
        z_zero_to_one: bool,
    ) -> &mut Self {
        self.mul(&Self::ortho_symmetric(
            width,
            height,
            z_near,
            z_far,
            z_zero_to_one,
        ))
    }

    /// Applies a 2D orthographic projection after this transform.
    pub fn apply_ortho_2d(&mut self, left: f64, right: f64, bottom: f64, top: f64) -> &mut Self {
        self.mul(&Self::ortho_2d(left, right, bottom, top))
    }

    /// Applies a right-handed look-at view after this transform.
    pub fn apply_look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> &mut Self {
        self.mul(&Self::look_at(eye, center, up))
    }

    /// Applies a left-handed look-at view after this transform.
    pub fn apply_look_at_lh(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> &mut Self {
        self.mul(&Self::look_at_lh(eye, center, up))
    }

    /// Applies a rotation-only look-along view after this transform.
    pub fn apply_look_along(&mut self, dir: Vec3, up: Vec3) -> &mut Self {
        self.mul(&Self::look_along(dir, up))
    }

    /// Applies a reflection about the plane `ax + by + cz + d = 0` (unit
    /// normal) after this transform.
    pub fn reflect(&mut self, a: f64, b: f64, c: f64, d: f64) -> &mut Self {
        self.mul(&Self::reflection(a, b, c, d))
    }

    /// Applies a reflection about the plane through `point` with the given
    /// normal after this transform.
    pub fn reflect_about(&mut self, normal: Vec3, point: Vec3) -> &mut Self {
        self.mul(&Self::reflection_about(normal, point))
    }

    /// Applies a shadow projection after this transform: flatten geometry
    /// onto the plane `a·x + b·y + c·z + d = 0` as lit by `light`.
    ///
    /// `light` is `[x, y, z, w]` with `w = 0` for a directional light and
    /// `w = 1` for a point light. The plane is normalised internally (a
    /// zero-length plane normal yields NaNs). The shadow operand is
    /// inherently projective; its projective row is folded into the columns
    /// during composition and then dropped, which is exactly the affine
    /// approximation this type can hold.
    pub fn shadow(&mut self, light: [f64; 4], plane: [f64; 4]) -> &mut Self {
        let inv_plane_len =
            1.0 / (plane[0] * plane[0] + plane[1] * plane[1] + plane[2] * plane[2]).sqrt();
        let an = plane[0] * inv_plane_len;
        let bn = plane[1] * inv_plane_len;
        let cn = plane[2] * inv_plane_len;
        let dn = plane[3] * inv_plane_len;
        let [lx, ly, lz, lw] = light;
        let dot = an * lx + bn * ly + cn * lz + dn * lw;

        // Columns of `dot * I4 - light ⊗ plane`.
        let rm00 = dot - an * lx;
        let rm01 = -an * ly;
        let rm02 = -an * lz;
        let rm03 = -an * lw;
        let rm10 = -bn * lx;
        let rm11 = dot - bn * ly;
        let rm12 = -bn * lz;
        let rm13 = -bn * lw;
        let rm20 = -cn * lx;
        let rm21 = -cn * ly;
        let rm22 = dot - cn * lz;
        let rm23 = -cn * lw;
        let rm30 = -dn * lx;
        let rm31 = -dn * ly;
        let rm32 = -dn * lz;
        let rm33 = dot - dn * lw;

        let nm00 = fma(
            self.m00,
            rm00,
            fma(self.m10, rm01, fma(self.m20, rm02, self.m30 * rm03)),
        );
        let nm01 = fma(
            self.m01,
            rm00,
            fma(self.m11, rm01, fma(self.m21, rm02, self.m31 * rm03)),
        );
        let nm02 = fma(
            self.m02,
            rm00,
            fma(self.m12, rm01, fma(self.m22, rm02, self.m32 * rm03)),
        );
        let nm10 = fma(
            self.m00,
            rm10,
            fma(self.m10, rm11, fma(self.m20, rm12, self.m30 * rm13)),
        );
        let nm11 = fma(
            self.m01,
            rm10,
            fma(self.m11, rm11, fma(self.m21, rm12, self.m31 * rm13)),
        );
        let nm12 = fma(
            self.m02,
            rm10,
            fma(self.m12, rm11, fma(self.m22, rm12, self.m32 * rm13)),
        );
        let nm20 = fma(
            self.m00,
            rm20,
            fma(self.m10, rm21, fma(self.m20, rm22, self.m30 * rm23)),
        );
        let nm21 = fma(
            self.m01,
            rm20,
            fma(self.m11, rm21, fma(self.m21, rm22, self.m31 * rm23)),
        );
        let nm22 = fma(
            self.m02,
            rm20,
            fma(self.m12, rm21, fma(self.m22, rm22, self.m32 * rm23)),
        );
        let nm30 = fma(
            self.m00,
            rm30,
            fma(self.m10, rm31, fma(self.m20, rm32, self.m30 * rm33)),
        );
        let nm31 = fma(
            self.m01,
            rm30,
            fma(self.m11, rm31, fma(self.m21, rm32, self.m31 * rm33)),
        );
        let nm32 = fma(
            self.m02,
            rm30,
            fma(self.m12, rm31, fma(self.m22, rm32, self.m32 * rm33)),
        );
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.m20 = nm20;
        self.m21 = nm21;
        self.m22 = nm22;
        self.m30 = nm30;
        self.m31 = nm31;
        self.m32 = nm32;
        self.properties = Properties::NONE;
        self
    }

    /// Adopts the linear part of a freshly built rotation, keeping this
    /// matrix's translation. Used by the pure-translation applier branches.
    fn adopt_rotation(&mut self, r: &Self) -> &mut Self {
        self.m00 = r.m00;
        self.m01 = r.m01;
        self.m02 = r.m02;
        self.m10 = r.m10;
        self.m11 = r.m11;
        self.m12 = r.m12;
        self.m20 = r.m20;
        self.m21 = r.m21;
        self.m22 = r.m22;
        self.properties = Properties::ORTHONORMAL;
        self
    }

    /// Pre-multiply flavour of [`Self::adopt_rotation`]: the rotation also
    /// acts on the stored translation column.
    fn adopt_rotation_of_translation(&mut self, r: &Self) -> &mut Self {
        let t = r.transform_direction(&Vec3::new(self.m30, self.m31, self.m32));
        self.adopt_rotation(r);
        self.m30 = t.x();
        self.m31 = t.y();
        self.m32 = t.z();
        self
    }

    /// `self.linear = self.linear * rm` for a 3x3 operand in column-major
    /// coefficient order; translation untouched.
    fn post_multiply_linear(&mut self, rm: &[f64; 9]) {
        let nm00 = fma(self.m00, rm[0], fma(self.m10, rm[1], self.m20 * rm[2]));
        let nm01 = fma(self.m01, rm[0], fma(self.m11, rm[1], self.m21 * rm[2]));
        let nm02 = fma(self.m02, rm[0], fma(self.m12, rm[1], self.m22 * rm[2]));
        let nm10 = fma(self.m00, rm[3], fma(self.m10, rm[4], self.m20 * rm[5]));
        let nm11 = fma(self.m01, rm[3], fma(self.m11, rm[4], self.m21 * rm[5]));
        let nm12 = fma(self.m02, rm[3], fma(self.m12, rm[4], self.m22 * rm[5]));
        let nm20 = fma(self.m00, rm[6], fma(self.m10, rm[7], self.m20 * rm[8]));
        let nm21 = fma(self.m01, rm[6], fma(self.m11, rm[7], self.m21 * rm[8]));
        let nm22 = fma(self.m02, rm[6], fma(self.m12, rm[7], self.m22 * rm[8]));
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.m20 = nm20;
        self.m21 = nm21;
        self.m22 = nm22;
    }

    /// `self = rm * self` for a 3x3 operand; acts on all four columns.
    fn pre_multiply_linear(&mut self, rm: &[f64; 9]) {
        let nm00 = fma(rm[0], self.m00, fma(rm[3], self.m01, rm[6] * self.m02));
        let nm01 = fma(rm[1], self.m00, fma(rm[4], self.m01, rm[7] * self.m02));
        let nm02 = fma(rm[2], self.m00, fma(rm[5], self.m01, rm[8] * self.m02));
        let nm10 = fma(rm[0], self.m10, fma(rm[3], self.m11, rm[6] * self.m12));
        let nm11 = fma(rm[1], self.m10, fma(rm[4], self.m11, rm[7] * self.m12));
        let nm12 = fma(rm[2], self.m10, fma(rm[5], self.m11, rm[8] * self.m12));
        let nm20 = fma(rm[0], self.m20, fma(rm[3], self.m21, rm[6] * self.m22));
        let nm21 = fma(rm[1], self.m20, fma(rm[4], self.m21, rm[7] * self.m22));
        let nm22 = fma(rm[2], self.m20, fma(rm[5], self.m21, rm[8] * self.m22));
        let nm30 = fma(rm[0], self.m30, fma(rm[3], self.m31, rm[6] * self.m32));
        let nm31 = fma(rm[1], self.m30, fma(rm[4], self.m31, rm[7] * self.m32));
        let nm32 = fma(rm[2], self.m30, fma(rm[5], self.m31, rm[8] * self.m32));
        self.m00 = nm00;
        self.m01 = nm01;
        self.m02 = nm02;
        self.m10 = nm10;
        self.m11 = nm11;
        self.m12 = nm12;
        self.m20 = nm20;
        self.m21 = nm21;
        self.m22 = nm22;
        self.m30 = nm30;
        self.m31 = nm31;
        self.m32 = nm32;
    }
}

/// Column-major Rodrigues rotation coefficients for a unit axis.
fn axis_rotation_coeffs(angle: f64, x: f64, y: f64, z: f64) -> [f64; 9] {
    let (sin, cos) = angle.sin_cos();
    let c = 1.0 - cos;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    [
        cos + x * x * c,
        xy * c + sin * z,
        xz * c - sin * y,
        xy * c - sin * z,
        cos + y * y * c,
        yz * c + sin * x,
        xz * c + sin * y,
        yz * c - sin * x,
        cos + z * z * c,
    ]
}

/// Column-major rotation coefficients read from a unit quaternion.
fn quat_rotation_coeffs(q: &Quat) -> [f64; 9] {
    let w2 = q.w() * q.w();
    let x2 = q.x() * q.x();
    let y2 = q.y() * q.y();
    let z2 = q.z() * q.z();
    let zw = q.z() * q.w();
    let dzw = zw + zw;
    let xy = q.x() * q.y();
    let dxy = xy + xy;
    let xz = q.x() * q.z();
    let dxz = xz + xz;
    let yw = q.y() * q.w();
    let dyw = yw + yw;
    let yz = q.y() * q.z();
    let dyz = yz + yz;
    let xw = q.x() * q.w();
    let dxw = xw + xw;
    [
        w2 + x2 - z2 - y2,
        dxy + dzw,
        dxz - dyw,
        dxy - dzw,
        y2 - z2 + w2 - x2,
        dyz + dxw,
        dyw + dxz,
        dyz - dxw,
        z2 - y2 - x2 + w2,
    ]
}

impl Default for Mat4x3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Equality compares the twelve scalars only; property flags are an
/// advisory cache and never participate.
impl PartialEq for Mat4x3 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

/// Converts a column-major `[f64; 12]` array into a matrix, computing the
/// property flags by full inspection.
impl From<[f64; 12]> for Mat4x3 {
    fn from(value: [f64; 12]) -> Self {
        let mut m = Self::from_parts(value, Properties::NONE);
        m.determine_properties();
        m
    }
}

impl core::ops::Mul for Mat4x3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = self;
        Mat4x3::mul(&mut out, &rhs);
        out
    }
}

impl core::ops::MulAssign for Mat4x3 {
    fn mul_assign(&mut self, rhs: Self) {
        self.mul(&rhs);
    }
}

impl core::ops::MulAssign<&Mat4x3> for Mat4x3 {
    fn mul_assign(&mut self, rhs: &Mat4x3) {
        self.mul(rhs);
    }
}

/// Serialises the twelve raw scalars; flags are derived state and omitted.
#[cfg(feature = "serde")]
impl serde::Serialize for Mat4x3 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_array(), serializer)
    }
}

/// Deserialises twelve scalars and recomputes the property flags by
/// inspection, so a hand-edited payload can never smuggle in unsound flags.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Mat4x3 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = <[f64; 12] as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from(data))
    }
}
