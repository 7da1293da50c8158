#![allow(missing_docs)]
use gimbal_core::{Mat4x3, Properties, Vec3};

mod common;
use common::{assert_approx_eq12, EPS};

#[test]
fn identity_inverts_to_identity() {
    let mut m = Mat4x3::identity();
    m.invert();
    assert_eq!(m, Mat4x3::identity());
    assert_eq!(m.properties(), Mat4x3::identity().properties());
}

#[test]
fn general_inverse_roundtrips_to_identity() {
    let m = Mat4x3::new(
        2.0, 0.5, 0.0, // col 0
        -1.0, 3.0, 0.25, // col 1
        0.5, 1.5, -2.0, // col 2
        4.0, -5.0, 6.0, // translation
    );
    let mut inv = m;
    inv.invert();
    assert_eq!(inv.properties(), Properties::NONE);

    let product = m * inv;
    assert_approx_eq12(product.to_array(), Mat4x3::identity().to_array(), 1e-9);
    let product_rev = inv * m;
    assert_approx_eq12(product_rev.to_array(), Mat4x3::identity().to_array(), 1e-9);
}

#[test]
fn orthonormal_inverse_is_exact_transpose() {
    let mut m = Mat4x3::rotation_y(0.8);
    m.mul(&Mat4x3::rotation_x(-0.3));
    m.set_translation(2.0, -7.0, 1.5);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    let a = m.to_array();

    let mut inv = m;
    inv.invert();
    assert_eq!(inv.properties(), Properties::ORTHONORMAL);
    let b = inv.to_array();

    // Linear part must be the bit-exact transpose...
    assert_eq!(b[0].to_bits(), a[0].to_bits());
    assert_eq!(b[1].to_bits(), a[3].to_bits());
    assert_eq!(b[2].to_bits(), a[6].to_bits());
    assert_eq!(b[3].to_bits(), a[1].to_bits());
    assert_eq!(b[4].to_bits(), a[4].to_bits());
    assert_eq!(b[5].to_bits(), a[7].to_bits());
    assert_eq!(b[6].to_bits(), a[2].to_bits());
    assert_eq!(b[7].to_bits(), a[5].to_bits());
    assert_eq!(b[8].to_bits(), a[8].to_bits());

    // ...and the translation exactly -(Rᵀ t).
    let t30 = -(a[0] * a[9] + a[1] * a[10] + a[2] * a[11]);
    let t31 = -(a[3] * a[9] + a[4] * a[10] + a[5] * a[11]);
    let t32 = -(a[6] * a[9] + a[7] * a[10] + a[8] * a[11]);
    assert_eq!(b[9].to_bits(), t30.to_bits());
    assert_eq!(b[10].to_bits(), t31.to_bits());
    assert_eq!(b[11].to_bits(), t32.to_bits());
}

#[test]
fn translation_inverse_negates_the_column() {
    let mut m = Mat4x3::translation(3.0, -4.0, 5.0);
    m.invert();
    assert_eq!(m.to_array()[9..], [-3.0, 4.0, -5.0]);
    let roundtrip = Mat4x3::translation(3.0, -4.0, 5.0) * m;
    assert_eq!(roundtrip, Mat4x3::identity());
}

#[test]
fn singular_inverse_propagates_nonfinite_without_error() {
    let mut m = Mat4x3::scaling(2.0, 0.0, 3.0);
    m.invert();
    assert!(!m.is_finite());
    assert_eq!(m.properties(), Properties::NONE);

    // Degeneracy keeps propagating through later arithmetic.
    let p = m.transform_point(&Vec3::new(1.0, 1.0, 1.0));
    assert!(!p.is_finite());
}

#[test]
fn inverse_undoes_transform_on_points() {
    let mut m = Mat4x3::translation(1.0, 2.0, 3.0);
    m.rotate_axis(1.1, Vec3::new(0.6, 0.8, 0.0));
    m.scale(2.0, 0.5, 1.5);
    let mut inv = m;
    inv.invert();

    let p = Vec3::new(-3.0, 0.25, 7.0);
    let q = inv.transform_point(&m.transform_point(&p));
    assert!((q.x() - p.x()).abs() <= EPS);
    assert!((q.y() - p.y()).abs() <= EPS);
    assert!((q.z() - p.z()).abs() <= EPS);
}
