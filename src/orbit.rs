use glam::{Mat4, Vec2, Vec3};
use log::debug;

use crate::camera::Camera;

/// Degrees of rotation per pixel of pointer travel.
pub const DEGREES_PER_PIXEL: f32 = 0.5;

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    /// Command on macOS, the Windows key elsewhere.
    pub meta: bool,
}

/// Arcball-style orbiting plus wheel zoom and dolly.
#[derive(Debug, Clone, Default)]
pub struct OrbitController {
    last: Option<Vec2>,
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.last = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.last = None;
    }

    /// Rotates the camera by the distance travelled since the previous event.
    /// Returns `true` when the camera changed.
    pub fn pointer_moved(&mut self, position: Vec2, camera: &mut Camera) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        let delta = position - last;
        if delta == Vec2::ZERO {
            return false;
        }
        rotate(camera, delta);
        self.last = Some(position);
        true
    }

    /// Applies a wheel step. `delta_y` follows the browser convention:
    /// positive when scrolling down, roughly 100 per notch.
    pub fn wheel(&mut self, delta_y: f32, modifiers: Modifiers, camera: &mut Camera) {
        if !modifiers.ctrl && !modifiers.alt && !modifiers.meta {
            camera.zoom(1.0 - delta_y / 1000.0);
        } else if modifiers.ctrl || modifiers.meta {
            let offset = delta_y / 1000.0;
            if !camera.dolly(offset, modifiers.ctrl) {
                debug!("dolly of {offset:.3} rejected, eye is at the look-at point");
            }
        }
    }
}

/// Rotates `eye` and `up` around `at`. The rotation axis is perpendicular to
/// the drag in camera space; the angle grows with the drag length.
pub fn rotate(camera: &mut Camera, drag: Vec2) {
    let axis = Vec3::new(-drag.y, -drag.x, 0.0).normalize_or_zero();
    if axis == Vec3::ZERO {
        return;
    }
    let angle = (DEGREES_PER_PIXEL * drag.length()).to_radians();
    let view = camera.view_matrix();
    let in_camera_space = view.inverse() * Mat4::from_axis_angle(axis, angle) * view;

    let eye_at = in_camera_space.transform_vector3(camera.eye - camera.at);
    camera.eye = camera.at + eye_at;
    camera.up = in_camera_space.transform_vector3(camera.up);
}
