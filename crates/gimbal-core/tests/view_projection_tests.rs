#![allow(missing_docs)]
use gimbal_core::{Mat4x3, Properties, Vec3};

mod common;
use common::{assert_approx_eq12, EPS};

fn assert_point_approx(p: Vec3, expected: [f64; 3]) {
    let a = p.to_array();
    for i in 0..3 {
        assert!(
            (a[i] - expected[i]).abs() <= EPS,
            "component {i}: {a:?} vs {expected:?}"
        );
    }
}

#[test]
fn ortho_symmetric_maps_near_plane_corner_to_ndc_corner() {
    let m = Mat4x3::ortho_symmetric(2.0, 2.0, 1.0, 100.0, false);
    assert_eq!(m.properties(), Properties::NONE);
    assert_point_approx(
        m.transform_point(&Vec3::new(1.0, 1.0, -1.0)),
        [1.0, 1.0, -1.0],
    );
    // Far plane corner lands on z = +1 in the [-1, 1] convention.
    assert_point_approx(
        m.transform_point(&Vec3::new(-1.0, -1.0, -100.0)),
        [-1.0, -1.0, 1.0],
    );
}

#[test]
fn ortho_zero_to_one_depth_convention() {
    let m = Mat4x3::ortho_symmetric(2.0, 2.0, 1.0, 100.0, true);
    assert_point_approx(m.transform_point(&Vec3::new(0.0, 0.0, -1.0)), [0.0, 0.0, 0.0]);
    assert_point_approx(
        m.transform_point(&Vec3::new(0.0, 0.0, -100.0)),
        [0.0, 0.0, 1.0],
    );
}

#[test]
fn ortho_off_center_matches_symmetric_for_centered_volume() {
    let sym = Mat4x3::ortho_symmetric(4.0, 3.0, 0.5, 50.0, false);
    let off = Mat4x3::ortho(-2.0, 2.0, -1.5, 1.5, 0.5, 50.0, false);
    assert_approx_eq12(sym.to_array(), off.to_array(), EPS);
}

#[test]
fn ortho_2d_maps_extents_to_unit_square() {
    let m = Mat4x3::ortho_2d(0.0, 640.0, 0.0, 480.0);
    assert_point_approx(m.transform_point(&Vec3::new(0.0, 0.0, 0.0)), [-1.0, -1.0, 0.0]);
    assert_point_approx(
        m.transform_point(&Vec3::new(640.0, 480.0, 0.0)),
        [1.0, 1.0, 0.0],
    );
}

#[test]
fn apply_ortho_composes_through_the_generic_primitive() {
    let mut m = Mat4x3::translation(1.0, 0.0, 0.0);
    m.apply_ortho_symmetric(2.0, 2.0, 1.0, 100.0, false);
    let expected =
        Mat4x3::translation(1.0, 0.0, 0.0) * Mat4x3::ortho_symmetric(2.0, 2.0, 1.0, 100.0, false);
    assert_approx_eq12(m.to_array(), expected.to_array(), EPS);
    assert_eq!(m.properties(), Properties::NONE);
}

#[test]
fn look_at_moves_eye_to_origin_looking_down_negative_z() {
    let eye = Vec3::new(3.0, 4.0, 5.0);
    let center = Vec3::new(3.0, 4.0, -2.0);
    let m = Mat4x3::look_at(eye, center, Vec3::UNIT_Y);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    assert_point_approx(m.transform_point(&eye), [0.0, 0.0, 0.0]);
    // The view target sits straight ahead, 7 units down -Z.
    assert_point_approx(m.transform_point(&center), [0.0, 0.0, -7.0]);
}

#[test]
fn look_at_lh_looks_down_positive_z() {
    let eye = Vec3::new(3.0, 4.0, 5.0);
    let center = Vec3::new(3.0, 4.0, -2.0);
    let m = Mat4x3::look_at_lh(eye, center, Vec3::UNIT_Y);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    assert_point_approx(m.transform_point(&center), [0.0, 0.0, 7.0]);
}

#[test]
fn look_along_is_the_rotation_part_of_look_at() {
    let dir = Vec3::new(0.0, 0.0, -7.0);
    let along = Mat4x3::look_along(dir, Vec3::UNIT_Y);
    let at = Mat4x3::look_at(Vec3::ZERO, dir, Vec3::UNIT_Y);
    assert_approx_eq12(along.to_array(), at.to_array(), EPS);
    assert_eq!(along.to_array()[9..], [0.0, 0.0, 0.0]);
}

#[test]
fn reflection_mirrors_points_across_the_plane() {
    // Plane x = 2: normal (1, 0, 0) through (2, 0, 0).
    let m = Mat4x3::reflection_about(Vec3::UNIT_X, Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    assert_point_approx(m.transform_point(&Vec3::new(5.0, 1.0, -3.0)), [-1.0, 1.0, -3.0]);
    // Points on the plane are fixed.
    assert_point_approx(m.transform_point(&Vec3::new(2.0, 9.0, 4.0)), [2.0, 9.0, 4.0]);
    // Reflecting twice is the identity.
    let twice = m * m;
    assert_approx_eq12(twice.to_array(), Mat4x3::identity().to_array(), EPS);
}

#[test]
fn directional_shadow_flattens_onto_the_plane() {
    // Ground plane y = 0, light shining straight down.
    let mut m = Mat4x3::identity();
    m.shadow([0.0, 1.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]);
    assert_eq!(m.properties(), Properties::NONE);
    let p = m.transform_point(&Vec3::new(3.0, 5.0, -2.0));
    // The shadow matrix scales by the plane dot; direction is what matters:
    // the image must lie on the plane regardless of the original height.
    assert!((p.y()).abs() <= EPS, "shadow left the plane: {p:?}");
}

#[test]
fn point_light_shadow_projects_away_from_the_light() {
    let light = [0.0, 10.0, 0.0, 1.0];
    let mut m = Mat4x3::identity();
    m.shadow(light, [0.0, 1.0, 0.0, 0.0]);
    let p = m.transform_point(&Vec3::new(2.0, 5.0, 0.0));
    // Homogeneous result is only proportional; normalise by the x-scale the
    // dropped projective row would have divided out.
    let w = light[1] - 5.0; // dot - bn*ly for this configuration
    let projected = [p.x() / w, p.y() / w, p.z() / w];
    // Ray from (0,10,0) through (2,5,0) hits y=0 at (4,0,0).
    assert!((projected[0] - 4.0).abs() <= 1e-9, "{projected:?}");
    assert!(projected[1].abs() <= 1e-9, "{projected:?}");
    assert!(projected[2].abs() <= 1e-9, "{projected:?}");
}

#[test]
fn view_appliers_compose_through_mul() {
    let base = Mat4x3::translation(1.0, 2.0, 3.0) * Mat4x3::rotation_x(0.4);
    let eye = Vec3::new(0.0, 1.0, 6.0);
    let center = Vec3::new(0.5, 0.0, -1.0);
    let up = Vec3::UNIT_Y;

    let mut a = base;
    a.apply_look_at(eye, center, up);
    assert_eq!(a, base * Mat4x3::look_at(eye, center, up));

    let mut b = base;
    b.apply_look_at_lh(eye, center, up);
    assert_eq!(b, base * Mat4x3::look_at_lh(eye, center, up));

    let mut c = base;
    c.apply_look_along(Vec3::new(0.0, 0.0, -1.0), up);
    assert_eq!(c, base * Mat4x3::look_along(Vec3::new(0.0, 0.0, -1.0), up));

    let mut d = base;
    d.reflect(0.0, 1.0, 0.0, -1.0);
    assert_eq!(d, base * Mat4x3::reflection(0.0, 1.0, 0.0, -1.0));

    let mut e = base;
    e.reflect_about(Vec3::UNIT_X, Vec3::ZERO);
    assert_eq!(e, base * Mat4x3::reflection_about(Vec3::UNIT_X, Vec3::ZERO));

    let mut f = base;
    f.apply_ortho(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0, false);
    assert_eq!(f, base * Mat4x3::ortho(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0, false));

    let mut g = base;
    g.apply_ortho_2d(0.0, 4.0, 0.0, 3.0);
    assert_eq!(g, base * Mat4x3::ortho_2d(0.0, 4.0, 0.0, 3.0));
}

#[test]
fn spherical_billboard_faces_the_target() {
    let obj = Vec3::new(1.0, 2.0, 3.0);
    let target = Vec3::new(4.0, 2.0, 7.0);
    let m = Mat4x3::billboard_spherical(obj, target, Vec3::UNIT_Y);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    // Local +Z maps onto the direction towards the target.
    let facing = m.transform_direction(&Vec3::UNIT_Z);
    let expected = target.sub(&obj).normalize();
    assert_point_approx(facing, expected.to_array());
    // Local origin lands at the object position.
    assert_point_approx(m.transform_point(&Vec3::ZERO), obj.to_array());
}

#[test]
fn cylindrical_billboard_keeps_the_up_axis() {
    let obj = Vec3::new(0.0, 0.0, 0.0);
    let target = Vec3::new(3.0, 8.0, 4.0);
    let m = Mat4x3::billboard_cylindrical(obj, target, Vec3::UNIT_Y);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    // The up axis is pinned, so local +Y stays +Y...
    assert_point_approx(m.transform_direction(&Vec3::UNIT_Y), [0.0, 1.0, 0.0]);
    // ...and the facing direction is the target direction with the up
    // component projected out.
    let facing = m.transform_direction(&Vec3::UNIT_Z);
    let expected = Vec3::new(3.0, 0.0, 4.0).normalize();
    assert_point_approx(facing, expected.to_array());
}

#[test]
fn shortest_arc_billboard_faces_the_target() {
    let obj = Vec3::new(-1.0, 0.5, 2.0);
    let target = Vec3::new(3.0, 1.5, -1.0);
    let m = Mat4x3::billboard_spherical_shortest(obj, target);
    assert_eq!(m.properties(), Properties::ORTHONORMAL);
    let facing = m.transform_direction(&Vec3::UNIT_Z);
    let expected = target.sub(&obj).normalize();
    assert_point_approx(facing, expected.to_array());
    assert_point_approx(m.transform_point(&Vec3::ZERO), obj.to_array());
}
