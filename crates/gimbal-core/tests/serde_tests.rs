#![cfg(feature = "serde")]
#![allow(missing_docs)]
use gimbal_core::{Mat4x3, Properties, Quat, Vec3};

#[test]
fn matrix_roundtrips_as_twelve_scalars() {
    let m = Mat4x3::translation(1.5, -2.0, 0.25);
    let json = serde_json::to_string(&m).unwrap();
    let back: Mat4x3 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    // Flags come back from inspection, not from the payload.
    assert!(back
        .properties()
        .contains(Properties::TRANSLATION | Properties::ORTHONORMAL));
}

#[test]
fn orthonormal_flag_downgrades_conservatively_across_serde() {
    let m = Mat4x3::rotation_y(0.9);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    let json = serde_json::to_string(&m).unwrap();
    let back: Mat4x3 = serde_json::from_str(&json).unwrap();
    // Raw inspection cannot prove orthonormality, so the flag is absent —
    // which is always legal — while the scalars survive exactly.
    assert_eq!(back, m);
    assert_eq!(back.properties(), Properties::NONE);
}

#[test]
fn hand_edited_payload_cannot_smuggle_flags() {
    // A payload claiming nothing but holding identity scalars still comes
    // back fully flagged, and vice versa there is no field to forge.
    let json = "[1.0,0.0,0.0,0.0,1.0,0.0,0.0,0.0,1.0,0.0,0.0,0.0]";
    let back: Mat4x3 = serde_json::from_str(json).unwrap();
    assert!(back.properties().contains(Properties::IDENTITY));
}

#[test]
fn vec3_and_quat_roundtrip() {
    let v = Vec3::new(1.0, 2.0, 3.0);
    let vj = serde_json::to_string(&v).unwrap();
    assert_eq!(serde_json::from_str::<Vec3>(&vj).unwrap(), v);

    let q = Quat::from_axis_angle(Vec3::UNIT_Y, 0.5);
    let qj = serde_json::to_string(&q).unwrap();
    assert_eq!(serde_json::from_str::<Quat>(&qj).unwrap(), q);
}
