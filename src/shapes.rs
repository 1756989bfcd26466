//! CPU-side geometry for the built-in primitives.
//!
//! Every shape is centred on the origin and fits a unit box. Vertices are
//! interleaved as `position.xyz` followed by `normal.xyz`.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Floats per interleaved vertex.
pub const VERTEX_STRIDE: usize = 6;

/// Indexed triangle mesh ready for upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * VERTEX_STRIDE..index * VERTEX_STRIDE + 3])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * VERTEX_STRIDE + 3..index * VERTEX_STRIDE + 6])
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
        index
    }

    /// Pushes a flat-shaded triangle whose normal faces away from the origin.
    fn push_facet(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let i0 = self.push_vertex(a, normal);
        let i1 = self.push_vertex(b, normal);
        let i2 = self.push_vertex(c, normal);
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Unique edges of the triangle list, as pairs for line topology.
    pub fn edges(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.extend_from_slice(&[a, b]);
                }
            }
        }
        lines
    }
}

/// Meshes the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Plane,
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Pyramid,
    Torus,
    /// Mesh loaded from an OBJ file at startup.
    Model,
}

impl MeshId {
    /// Procedurally generated shapes, in upload order.
    pub const BUILTIN: [MeshId; 7] = [
        MeshId::Plane,
        MeshId::Cube,
        MeshId::Sphere,
        MeshId::Cylinder,
        MeshId::Cone,
        MeshId::Pyramid,
        MeshId::Torus,
    ];

    /// Entries offered for the central object; keys 1–8 follow this order.
    pub const SELECTABLE: [MeshId; 8] = [
        MeshId::Cube,
        MeshId::Sphere,
        MeshId::Cylinder,
        MeshId::Cone,
        MeshId::Pyramid,
        MeshId::Torus,
        MeshId::Plane,
        MeshId::Model,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MeshId::Plane => "plane",
            MeshId::Cube => "cube",
            MeshId::Sphere => "sphere",
            MeshId::Cylinder => "cylinder",
            MeshId::Cone => "cone",
            MeshId::Pyramid => "pyramid",
            MeshId::Torus => "torus",
            MeshId::Model => "model",
        }
    }

    /// Geometry for built-in shapes; `None` for [`MeshId::Model`].
    pub fn geometry(self) -> Option<Geometry> {
        Some(match self {
            MeshId::Plane => plane(),
            MeshId::Cube => cube(),
            MeshId::Sphere => sphere(24, 16),
            MeshId::Cylinder => cylinder(24),
            MeshId::Cone => cone(24),
            MeshId::Pyramid => pyramid(),
            MeshId::Torus => torus(32, 16),
            MeshId::Model => return None,
        })
    }
}

pub fn plane() -> Geometry {
    let mut geometry = Geometry::default();
    for (x, z) in [(-0.5, 0.5), (0.5, 0.5), (0.5, -0.5), (-0.5, -0.5)] {
        geometry.push_vertex(Vec3::new(x, 0.0, z), Vec3::Y);
    }
    geometry.indices = vec![0, 1, 2, 0, 2, 3];
    geometry
}

pub fn cube() -> Geometry {
    let faces = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
    let mut geometry = Geometry::default();
    for normal in faces {
        // Two tangents spanning the face, ordered so that u × v == normal.
        let u = if normal.y.abs() > 0.5 { Vec3::Z } else { Vec3::Y }.cross(normal);
        let v = normal.cross(u);
        let center = normal * 0.5;
        let base = geometry.vertex_count() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            geometry.push_vertex(center + u * su + v * sv, normal);
        }
        geometry
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    geometry
}

pub fn sphere(slices: u32, stacks: u32) -> Geometry {
    let radius = 0.5;
    let mut geometry = Geometry::default();
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            geometry.push_vertex(normal * radius, normal);
        }
    }
    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            geometry
                .indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    geometry
}

pub fn cylinder(slices: u32) -> Geometry {
    let radius = 0.5;
    let half = 0.5;
    let mut geometry = Geometry::default();
    for slice in 0..=slices {
        let theta = TAU * slice as f32 / slices as f32;
        let normal = Vec3::new(theta.cos(), 0.0, theta.sin());
        geometry.push_vertex(normal * radius - Vec3::Y * half, normal);
        geometry.push_vertex(normal * radius + Vec3::Y * half, normal);
    }
    for slice in 0..slices {
        let a = slice * 2;
        geometry
            .indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }
    push_cap(&mut geometry, slices, radius, half);
    push_cap(&mut geometry, slices, radius, -half);
    geometry
}

pub fn cone(slices: u32) -> Geometry {
    let radius = 0.5;
    let height = 1.0;
    let half = height / 2.0;
    let mut geometry = Geometry::default();
    for slice in 0..=slices {
        let theta = TAU * slice as f32 / slices as f32;
        let normal = Vec3::new(theta.cos() * height, radius, theta.sin() * height).normalize();
        let rim = Vec3::new(theta.cos() * radius, -half, theta.sin() * radius);
        geometry.push_vertex(rim, normal);
        geometry.push_vertex(Vec3::Y * half, normal);
    }
    for slice in 0..slices {
        let a = slice * 2;
        geometry.indices.extend_from_slice(&[a, a + 1, a + 2]);
    }
    push_cap(&mut geometry, slices, radius, -half);
    geometry
}

pub fn pyramid() -> Geometry {
    let apex = Vec3::new(0.0, 0.5, 0.0);
    let corners = [
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
    ];
    let mut geometry = Geometry::default();
    for side in 0..corners.len() {
        geometry.push_facet(corners[side], corners[(side + 1) % corners.len()], apex);
    }
    geometry.push_facet(corners[0], corners[1], corners[2]);
    geometry.push_facet(corners[0], corners[2], corners[3]);
    geometry
}

pub fn torus(rings: u32, sides: u32) -> Geometry {
    let major = 0.35;
    let minor = 0.15;
    let mut geometry = Geometry::default();
    for ring in 0..=rings {
        let u = TAU * ring as f32 / rings as f32;
        let center = Vec3::new(u.cos() * major, 0.0, u.sin() * major);
        for side in 0..=sides {
            let v = TAU * side as f32 / sides as f32;
            let normal = Vec3::new(v.cos() * u.cos(), v.sin(), v.cos() * u.sin());
            geometry.push_vertex(center + normal * minor, normal);
        }
    }
    let row = sides + 1;
    for ring in 0..rings {
        for side in 0..sides {
            let a = ring * row + side;
            let b = a + row;
            geometry
                .indices
                .extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    geometry
}

/// Disc at height `y` facing away from the shape's centre.
fn push_cap(geometry: &mut Geometry, slices: u32, radius: f32, y: f32) {
    let normal = Vec3::Y * y.signum();
    let center = geometry.push_vertex(Vec3::Y * y, normal);
    for slice in 0..=slices {
        let theta = TAU * slice as f32 / slices as f32;
        geometry.push_vertex(
            Vec3::new(theta.cos() * radius, y, theta.sin() * radius),
            normal,
        );
    }
    for slice in 0..slices {
        let a = center + 1 + slice;
        geometry.indices.extend_from_slice(&[center, a, a + 1]);
    }
}
