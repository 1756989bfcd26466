use glam::{Mat4, Vec3, Vec4};
use orbit_lab::{plan_frame, LightKind, SceneState, Topology, MAX_LIGHTS};

fn assert_mat_eq(actual: Mat4, expected: Mat4) {
    assert!(
        actual.abs_diff_eq(expected, 1e-5),
        "expected {expected:?}, got {actual:?}"
    );
}

/// OpenGL perspective for the default 45 degree camera with near 0.1 and far 20.
fn expected_projection(aspect: f32) -> Mat4 {
    let (near, far) = (0.1f32, 20.0f32);
    let f = 1.0 / (45f32.to_radians() / 2.0).tan();
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (far + near) / (near - far), -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near / (near - far), 0.0),
    )
}

#[test]
fn reference_camera_matrices_match_the_textbook_formulas() {
    let mut scene = SceneState::default();
    scene.camera.set_viewport(800, 600);
    let plan = plan_frame(&scene);

    // look-at from (0, 0, 5) towards the origin is a pure translation.
    let view = Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, -5.0, 1.0),
    );
    assert_mat_eq(plan.view, view);
    assert_mat_eq(plan.projection, expected_projection(800.0 / 600.0));
}

#[test]
fn default_camera_has_a_square_aspect() {
    let plan = plan_frame(&SceneState::default());
    assert_mat_eq(plan.projection, expected_projection(1.0));
}

#[test]
fn wireframe_changes_only_the_topology() {
    let mut scene = SceneState::default();
    scene.advance(0.7);
    let shaded = plan_frame(&scene);
    scene.options.wireframe = true;
    let wire = plan_frame(&scene);

    assert_eq!(shaded.draws.len(), wire.draws.len());
    for (a, b) in shaded.draws.iter().zip(&wire.draws) {
        assert_eq!(a.topology, Topology::Triangles);
        assert_eq!(b.topology, Topology::Lines);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.program, b.program);
        assert_eq!(a.model_view, b.model_view);
        assert_eq!(a.material, b.material);
    }
    assert_eq!(shaded.lights, wire.lights);
}

#[test]
fn light_block_never_exceeds_the_limit() {
    let mut scene = SceneState::default();
    while scene.add_light() {}
    assert!(scene.active_lights() > MAX_LIGHTS);

    let plan = plan_frame(&scene);
    assert_eq!(plan.lights.count as usize, MAX_LIGHTS);
    // The first active light is still the first one uploaded.
    let first = plan.view * Vec3::new(2.0, 3.0, 2.0).extend(1.0);
    assert_eq!(Vec4::from(plan.lights.lights[0].position), first);
}

#[test]
fn camera_light_is_uploaded_untransformed() {
    let mut scene = SceneState::default();
    for light in &mut scene.lights {
        light.active = light.kind == LightKind::Camera;
    }
    scene.lights[1].position = Vec3::new(0.5, 0.0, 0.0);
    scene.camera.eye = Vec3::new(3.0, 1.0, 4.0);

    let plan = plan_frame(&scene);
    assert_eq!(plan.lights.count, 1);
    assert_eq!(plan.lights.lights[0].position, [0.5, 0.0, 0.0, 1.0]);
}
