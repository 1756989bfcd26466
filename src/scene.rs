use glam::Vec3;

use crate::camera::Camera;
use crate::lighting::{Light, LightKind};
use crate::material::Material;
use crate::shapes::MeshId;

/// Upper bound on lights the panel lets the user author.
pub const MAX_AUTHORED_LIGHTS: usize = 12;

/// Toggles exposed in the panel's "options" folder.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub wireframe: bool,
    /// Colour surfaces by their eye-space normal instead of lighting them.
    pub normals: bool,
    pub animate: bool,
    pub show_lights: bool,
    pub primitive: MeshId,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wireframe: false,
            normals: false,
            animate: true,
            show_lights: true,
            primitive: MeshId::Sphere,
        }
    }
}

/// Mutable state shared by the event handlers, the debug panel and the
/// frame planner. It is always passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub camera: Camera,
    pub options: Options,
    pub material: Material,
    pub lights: Vec<Light>,
    /// Seconds of animation played so far; frozen while `animate` is off.
    pub time: f32,
    /// Set while the pointer is held down over the canvas.
    pub dragging: bool,
    /// Whether an OBJ model was loaded into the [`MeshId::Model`] slot.
    pub model_loaded: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            options: Options::default(),
            material: Material::default(),
            lights: default_lights(),
            time: 0.0,
            dragging: false,
            model_loaded: false,
        }
    }
}

impl SceneState {
    /// Advances the animation clock by `dt` seconds when animation is enabled.
    pub fn advance(&mut self, dt: f32) {
        if self.options.animate && dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
    }

    /// Primitives the user may currently pick.
    pub fn selectable_meshes(&self) -> impl Iterator<Item = MeshId> + '_ {
        MeshId::SELECTABLE
            .into_iter()
            .filter(|&id| id != MeshId::Model || self.model_loaded)
    }

    /// Selects a primitive, ignoring the model slot when nothing was loaded.
    pub fn select(&mut self, id: MeshId) -> bool {
        if id == MeshId::Model && !self.model_loaded {
            return false;
        }
        self.options.primitive = id;
        true
    }

    pub fn add_light(&mut self) -> bool {
        if self.lights.len() >= MAX_AUTHORED_LIGHTS {
            return false;
        }
        self.lights.push(Light::default());
        true
    }

    pub fn active_lights(&self) -> usize {
        self.lights.iter().filter(|light| light.active).count()
    }

    /// Background colour; tinted red while the camera is being dragged.
    pub fn clear_color(&self) -> [f64; 4] {
        if self.dragging {
            [0.2, 0.0, 0.0, 1.0]
        } else {
            [0.0, 0.0, 0.0, 1.0]
        }
    }
}

fn default_lights() -> Vec<Light> {
    vec![
        Light {
            position: Vec3::new(2.0, 3.0, 2.0),
            ambient: [60, 60, 60],
            diffuse: [255, 255, 255],
            specular: [255, 255, 255],
            ..Light::default()
        },
        Light {
            position: Vec3::ZERO,
            ambient: [0, 0, 0],
            diffuse: [90, 90, 160],
            specular: [120, 120, 200],
            active: false,
            kind: LightKind::Camera,
            ..Light::default()
        },
        Light {
            position: Vec3::new(1.0, 1.0, 0.0),
            ambient: [0, 0, 0],
            diffuse: [220, 120, 40],
            specular: [255, 200, 150],
            directional: true,
            active: false,
            kind: LightKind::Object,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_only_runs_while_animating() {
        let mut scene = SceneState::default();
        scene.advance(0.5);
        assert_eq!(scene.time, 0.5);
        scene.options.animate = false;
        scene.advance(0.5);
        assert_eq!(scene.time, 0.5);
        scene.options.animate = true;
        scene.advance(f32::NAN);
        assert_eq!(scene.time, 0.5);
    }

    #[test]
    fn model_slot_requires_a_loaded_model() {
        let mut scene = SceneState::default();
        assert!(!scene.select(MeshId::Model));
        assert!(!scene.selectable_meshes().any(|id| id == MeshId::Model));
        scene.model_loaded = true;
        assert!(scene.select(MeshId::Model));
        assert_eq!(scene.options.primitive, MeshId::Model);
    }

    #[test]
    fn authored_lights_are_bounded() {
        let mut scene = SceneState::default();
        while scene.add_light() {}
        assert_eq!(scene.lights.len(), MAX_AUTHORED_LIGHTS);
    }

    #[test]
    fn dragging_tints_the_background() {
        let mut scene = SceneState::default();
        assert_eq!(scene.clear_color()[0], 0.0);
        scene.dragging = true;
        assert_eq!(scene.clear_color()[0], 0.2);
    }
}
