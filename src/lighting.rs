//! Light descriptors and their packing into the shader's light block.
//!
//! Lights are authored in whatever space is convenient for their kind and
//! with 0–255 colours. Before every frame they are packed into a dense
//! [`LightUniforms`] block: active lights only, capped at [`MAX_LIGHTS`],
//! positions in camera space and colours in 0–1.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use log::debug;

/// Number of light slots in the shader's uniform block.
pub const MAX_LIGHTS: usize = 8;

/// Distance from the look-at point at which directional lights are marked.
pub const DIRECTIONAL_MARKER_DISTANCE: f32 = 3.0;

/// RGB colour in the 0–255 authoring range.
pub type Rgb = [u8; 3];

/// Coordinate space a light's position is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Fixed in world space.
    World,
    /// Expressed in camera space; travels with the eye.
    Camera,
    /// Expressed in the local space of the animated object.
    Object,
}

impl LightKind {
    pub const ALL: [LightKind; 3] = [LightKind::World, LightKind::Camera, LightKind::Object];

    pub fn label(self) -> &'static str {
        match self {
            LightKind::World => "world",
            LightKind::Camera => "camera",
            LightKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub directional: bool,
    pub active: bool,
    pub kind: LightKind,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 2.0),
            ambient: [50, 50, 50],
            diffuse: [60, 60, 60],
            specular: [200, 200, 200],
            directional: false,
            active: true,
            kind: LightKind::World,
        }
    }
}

impl Light {
    /// Homogeneous position: `w = 0` for directional lights, `1` otherwise.
    pub fn homogeneous(&self) -> Vec4 {
        let w = if self.directional { 0.0 } else { 1.0 };
        self.position.extend(w)
    }

    /// Position of the light in camera space for the given frame.
    pub fn eye_position(&self, spaces: &LightSpaces) -> Vec4 {
        let position = self.homogeneous();
        match self.kind {
            LightKind::World => spaces.view * position,
            LightKind::Object => spaces.view * spaces.object * position,
            LightKind::Camera => position,
        }
    }

    /// Position of the light in world space, used to place its marker.
    pub fn world_position(&self, spaces: &LightSpaces) -> Vec3 {
        let position = self.position.extend(1.0);
        let world = match self.kind {
            LightKind::World => position,
            LightKind::Object => spaces.object * position,
            LightKind::Camera => spaces.view.inverse() * position,
        };
        world.truncate()
    }

    /// Where the light's marker is drawn. Point lights sit at their world
    /// position; directional lights sit along their world-space direction at
    /// [`DIRECTIONAL_MARKER_DISTANCE`] from `target`.
    pub fn marker_position(&self, spaces: &LightSpaces, target: Vec3) -> Vec3 {
        if !self.directional {
            return self.world_position(spaces);
        }
        let direction = match self.kind {
            LightKind::World => self.position,
            LightKind::Object => spaces.object.transform_vector3(self.position),
            LightKind::Camera => spaces.view.inverse().transform_vector3(self.position),
        };
        target + direction.normalize_or_zero() * DIRECTIONAL_MARKER_DISTANCE
    }
}

/// Transforms needed to bring every light kind into camera space.
#[derive(Debug, Clone, Copy)]
pub struct LightSpaces {
    pub view: Mat4,
    pub object: Mat4,
}

/// Maps an authoring channel in 0–255 to 0–1.
pub fn normalize_channel(value: u8) -> f32 {
    f32::from(value) / 255.0
}

pub fn normalize_rgb(color: Rgb) -> Vec3 {
    Vec3::new(
        normalize_channel(color[0]),
        normalize_channel(color[1]),
        normalize_channel(color[2]),
    )
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// Uniform block consumed by the lighting programs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    pub count: u32,
    _padding: [u32; 3],
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl LightUniforms {
    /// Packs the active lights, in declaration order, into the uniform block.
    ///
    /// Active lights past [`MAX_LIGHTS`] are dropped.
    pub fn upload(lights: &[Light], spaces: &LightSpaces) -> Self {
        let mut block = Self::default();
        let mut dropped = 0usize;
        for light in lights.iter().filter(|light| light.active) {
            let slot = block.count as usize;
            if slot == MAX_LIGHTS {
                dropped += 1;
                continue;
            }
            block.lights[slot] = GpuLight {
                position: light.eye_position(spaces).into(),
                ambient: normalize_rgb(light.ambient).extend(1.0).into(),
                diffuse: normalize_rgb(light.diffuse).extend(1.0).into(),
                specular: normalize_rgb(light.specular).extend(1.0).into(),
            };
            block.count += 1;
        }
        if dropped > 0 {
            debug!("{dropped} active light(s) exceed the {MAX_LIGHTS}-light limit and were skipped");
        }
        block
    }

    pub fn active(&self) -> &[GpuLight] {
        &self.lights[..self.count as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spaces() -> LightSpaces {
        LightSpaces {
            view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
            object: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        }
    }

    fn light(kind: LightKind, position: Vec3) -> Light {
        Light {
            kind,
            position,
            ..Light::default()
        }
    }

    #[test]
    fn count_never_exceeds_limit() {
        for total in [0, 1, 7, 8, 9, 20] {
            let lights = vec![Light::default(); total];
            let block = LightUniforms::upload(&lights, &spaces());
            assert_eq!(block.count as usize, total.min(MAX_LIGHTS));
        }
    }

    #[test]
    fn inactive_lights_are_skipped_and_order_is_kept() {
        let mut lights = Vec::new();
        for index in 0..12 {
            lights.push(Light {
                active: index % 3 != 0,
                diffuse: [index as u8, 0, 0],
                ..Light::default()
            });
        }
        let block = LightUniforms::upload(&lights, &spaces());
        let reds: Vec<f32> = block.active().iter().map(|l| l.diffuse[0] * 255.0).collect();
        let expected = [1.0, 2.0, 4.0, 5.0, 7.0, 8.0, 10.0, 11.0];
        assert_eq!(reds.len(), expected.len());
        for (red, want) in reds.iter().zip(expected) {
            assert!((red - want).abs() < 1e-3);
        }
    }

    #[test]
    fn homogeneous_coordinate_follows_directional_flag() {
        let lights = vec![
            Light {
                directional: true,
                ..Light::default()
            },
            Light::default(),
        ];
        let block = LightUniforms::upload(&lights, &spaces());
        assert_eq!(block.lights[0].position[3], 0.0);
        assert_eq!(block.lights[1].position[3], 1.0);
    }

    #[test]
    fn colours_are_normalized_exactly() {
        for value in 0..=255u8 {
            assert_eq!(normalize_channel(value), value as f32 / 255.0);
        }
        let lights = vec![Light {
            ambient: [0, 128, 255],
            ..Light::default()
        }];
        let block = LightUniforms::upload(&lights, &spaces());
        assert_eq!(block.lights[0].ambient, [0.0, 128.0 / 255.0, 1.0, 1.0]);
    }

    #[test]
    fn positions_are_moved_into_camera_space_by_kind() {
        let spaces = spaces();
        let lights = vec![
            light(LightKind::World, Vec3::ZERO),
            light(LightKind::Camera, Vec3::new(1.0, 2.0, 3.0)),
            light(LightKind::Object, Vec3::ZERO),
        ];
        let block = LightUniforms::upload(&lights, &spaces);
        assert!(Vec4::from(block.lights[0].position).abs_diff_eq(Vec4::new(0.0, 0.0, -5.0, 1.0), 1e-5));
        assert_eq!(block.lights[1].position, [1.0, 2.0, 3.0, 1.0]);
        assert!(Vec4::from(block.lights[2].position).abs_diff_eq(Vec4::new(0.0, 1.0, -5.0, 1.0), 1e-5));
    }

    #[test]
    fn directional_lights_ignore_view_translation() {
        let lights = vec![Light {
            directional: true,
            position: Vec3::new(0.0, 1.0, 0.0),
            ..Light::default()
        }];
        let block = LightUniforms::upload(&lights, &spaces());
        assert!(Vec4::from(block.lights[0].position).abs_diff_eq(Vec4::new(0.0, 1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn camera_light_world_position_tracks_the_eye() {
        let light = light(LightKind::Camera, Vec3::ZERO);
        let world = light.world_position(&spaces());
        assert!(world.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn directional_marker_sits_along_the_direction_from_the_target() {
        let mut sun = light(LightKind::World, Vec3::new(0.0, 10.0, 0.0));
        sun.directional = true;
        let target = Vec3::new(1.0, 0.0, 0.0);
        let marker = sun.marker_position(&spaces(), target);
        assert!(marker.abs_diff_eq(Vec3::new(1.0, DIRECTIONAL_MARKER_DISTANCE, 0.0), 1e-5));

        // Object-space directions ignore the object's translation.
        sun.kind = LightKind::Object;
        let marker = sun.marker_position(&spaces(), target);
        assert!(marker.abs_diff_eq(Vec3::new(1.0, DIRECTIONAL_MARKER_DISTANCE, 0.0), 1e-5));
    }

    #[test]
    fn point_marker_uses_the_world_position() {
        let bulb = light(LightKind::Object, Vec3::new(1.0, 0.0, 0.0));
        let marker = bulb.marker_position(&spaces(), Vec3::ZERO);
        assert!(marker.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn uniform_block_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 16 + 64 * MAX_LIGHTS);
    }
}
