//! Per-frame planning.
//!
//! [`plan_frame`] turns the scene state into everything the GPU needs for one
//! frame: global matrices, the packed light block and an ordered list of draw
//! calls. It performs no GPU work, so the whole frame can be inspected in
//! tests and in the headless summary.

use glam::{Mat4, Vec3, Vec4};

use crate::lighting::{normalize_rgb, LightSpaces, LightUniforms, MAX_LIGHTS};
use crate::material::{Material, ShaderVariant};
use crate::scene::SceneState;
use crate::shapes::MeshId;
use crate::stack::MatrixStack;

const GROUND_HEIGHT: f32 = -0.75;
const GROUND_SIZE: f32 = 6.0;
const MARKER_SIZE: f32 = 0.08;
const BOB_AMPLITUDE: f32 = 0.25;
const BOB_FREQUENCY: f32 = 2.0;
const SPIN_DEGREES_PER_SECOND: f32 = 45.0;

/// Primitive assembly used for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

impl Topology {
    pub fn label(self) -> &'static str {
        match self {
            Topology::Triangles => "triangles",
            Topology::Lines => "lines",
        }
    }
}

/// Program a draw call is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Lit(ShaderVariant),
    /// Unlit flat colour, used for light markers.
    Marker,
}

impl ProgramKind {
    pub fn label(self) -> &'static str {
        match self {
            ProgramKind::Lit(variant) => variant.label(),
            ProgramKind::Marker => "marker",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshId,
    pub program: ProgramKind,
    pub topology: Topology,
    pub model_view: Mat4,
    /// Inverse-transpose of `model_view`, for transforming normals.
    pub normals: Mat4,
    /// Normalized ambient, diffuse and specular (shininess in `w`).
    pub material: [Vec4; 3],
    /// Flat colour for the marker program.
    pub color: Vec4,
}

impl DrawCall {
    fn new(
        mesh: MeshId,
        program: ProgramKind,
        topology: Topology,
        model_view: Mat4,
        material: [Vec4; 3],
        color: Vec4,
    ) -> Self {
        Self {
            mesh,
            program,
            topology,
            model_view,
            normals: normal_matrix(model_view),
            material,
            color,
        }
    }
}

/// Everything needed to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub view: Mat4,
    pub projection: Mat4,
    /// Normal matrix of the view transform.
    pub view_normals: Mat4,
    pub lights: LightUniforms,
    pub use_normals: bool,
    pub clear_color: [f64; 4],
    pub draws: Vec<DrawCall>,
}

/// Inverse-transpose of a transform; maps normals the way `m` maps points.
pub fn normal_matrix(m: Mat4) -> Mat4 {
    m.inverse().transpose()
}

/// Local transform of the central object at animation time `time`: a
/// vertical bob combined with a steady spin about Y.
pub fn object_transform(time: f32) -> Mat4 {
    let bob = BOB_AMPLITUDE * (BOB_FREQUENCY * time).sin();
    Mat4::from_translation(Vec3::Y * bob)
        * Mat4::from_rotation_y((SPIN_DEGREES_PER_SECOND * time).to_radians())
}

pub fn plan_frame(scene: &SceneState) -> FramePlan {
    let camera = &scene.camera;
    let options = &scene.options;
    let view = camera.view_matrix();
    let projection = camera.projection_matrix();
    let topology = if options.wireframe {
        Topology::Lines
    } else {
        Topology::Triangles
    };
    let lit = ProgramKind::Lit(scene.material.shader);
    let object = object_transform(scene.time);

    let mut stack = MatrixStack::new();
    stack.load(view);
    let mut draws = Vec::new();

    stack.scoped(|stack| {
        stack.translate(Vec3::Y * GROUND_HEIGHT);
        stack.scale(Vec3::new(GROUND_SIZE, 1.0, GROUND_SIZE));
        draws.push(DrawCall::new(
            MeshId::Plane,
            lit,
            topology,
            stack.current(),
            Material::ground().coefficients(),
            Vec4::ONE,
        ));
    });

    stack.scoped(|stack| {
        stack.multiply(object);
        draws.push(DrawCall::new(
            options.primitive,
            lit,
            topology,
            stack.current(),
            scene.material.coefficients(),
            Vec4::ONE,
        ));
    });

    let spaces = LightSpaces { view, object };
    let lights = LightUniforms::upload(&scene.lights, &spaces);

    if options.show_lights {
        // Only lights that made it into the uniform block get a marker.
        let uploaded = scene.lights.iter().filter(|light| light.active).take(MAX_LIGHTS);
        for light in uploaded {
            let position = light.marker_position(&spaces, camera.at);
            let color = normalize_rgb(light.diffuse).extend(1.0);
            stack.scoped(|stack| {
                stack.translate(position);
                stack.scale(Vec3::splat(MARKER_SIZE));
                draws.push(DrawCall::new(
                    MeshId::Sphere,
                    ProgramKind::Marker,
                    topology,
                    stack.current(),
                    Material::default().coefficients(),
                    color,
                ));
            });
        }
    }
    debug_assert_eq!(stack.depth(), 0);

    FramePlan {
        view,
        projection,
        view_normals: normal_matrix(view),
        lights,
        use_normals: options.normals,
        clear_color: scene.clear_color(),
        draws,
    }
}
