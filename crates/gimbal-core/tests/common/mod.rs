#![allow(missing_docs)]
#![allow(dead_code)]

use gimbal_core::{Mat4x3, Properties};

pub const EPS: f64 = 1e-9;

/// Asserts two 12-scalar arrays match within an absolute tolerance.
pub fn assert_approx_eq12(a: [f64; 12], b: [f64; 12], eps: f64) {
    for i in 0..12 {
        assert!(
            (a[i] - b[i]).abs() <= eps,
            "index {i}: {a:?} vs {b:?}"
        );
    }
}

/// Asserts two 12-scalar arrays are bit-for-bit identical.
pub fn assert_bits_eq12(a: [f64; 12], b: [f64; 12]) {
    for i in 0..12 {
        assert_eq!(
            a[i].to_bits(),
            b[i].to_bits(),
            "index {i}: {a:?} vs {b:?}"
        );
    }
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Brute-force check that every asserted property flag genuinely holds for
/// the raw scalars. Absent flags are always legal; present ones must be
/// backed by the data.
pub fn assert_flags_sound(m: &Mat4x3) {
    let p = m.properties();
    let a = m.to_array();
    if p.contains(Properties::IDENTITY) {
        assert!(
            p.contains(Properties::TRANSLATION) && p.contains(Properties::ORTHONORMAL),
            "identity must imply translation and orthonormal: {p:?}"
        );
        assert_eq!(a, Mat4x3::identity().to_array(), "identity flag on non-identity data");
    }
    if p.contains(Properties::TRANSLATION) {
        assert_eq!(
            a[..9],
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            "translation flag with non-identity linear part"
        );
    }
    if p.contains(Properties::ORTHONORMAL) {
        let c0 = [a[0], a[1], a[2]];
        let c1 = [a[3], a[4], a[5]];
        let c2 = [a[6], a[7], a[8]];
        assert!((dot3(c0, c0) - 1.0).abs() <= EPS, "col0 not unit: {a:?}");
        assert!((dot3(c1, c1) - 1.0).abs() <= EPS, "col1 not unit: {a:?}");
        assert!((dot3(c2, c2) - 1.0).abs() <= EPS, "col2 not unit: {a:?}");
        assert!(dot3(c0, c1).abs() <= EPS, "col0/col1 not orthogonal: {a:?}");
        assert!(dot3(c0, c2).abs() <= EPS, "col0/col2 not orthogonal: {a:?}");
        assert!(dot3(c1, c2).abs() <= EPS, "col1/col2 not orthogonal: {a:?}");
    }
}
