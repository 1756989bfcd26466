use glam::{Mat4, Vec3};

pub const MIN_FOVY: f32 = 1.0;
pub const MAX_FOVY: f32 = 179.0;
/// Smallest distance kept between the near and far clip planes.
pub const MIN_DEPTH_RANGE: f32 = 0.5;
/// The eye never dollies closer than this to the look-at point.
pub const MIN_EYE_DISTANCE: f32 = 0.05;

/// Look-at camera with a symmetric perspective projection.
///
/// `aspect` follows the surface size and is not user editable; the clip
/// planes keep `far - near >= MIN_DEPTH_RANGE` through their setters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            at: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

impl Camera {
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_fovy(&mut self, degrees: f32) {
        self.fovy = degrees.clamp(MIN_FOVY, MAX_FOVY);
    }

    /// Moves the near plane, never closer than `MIN_DEPTH_RANGE` to the far plane.
    pub fn set_near(&mut self, near: f32) {
        self.near = near.min(self.far - MIN_DEPTH_RANGE);
    }

    /// Moves the far plane, never closer than `MIN_DEPTH_RANGE` to the near plane.
    pub fn set_far(&mut self, far: f32) {
        self.far = far.max(self.near + MIN_DEPTH_RANGE);
    }

    /// Derives the aspect ratio from a surface size. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Scales the field of view; factors below one zoom in.
    pub fn zoom(&mut self, factor: f32) {
        self.set_fovy(self.fovy * factor);
    }

    /// Translates the eye along the viewing direction, optionally dragging the
    /// look-at point with it. Returns `false` when the move was rejected.
    pub fn dolly(&mut self, offset: f32, move_target: bool) -> bool {
        let to_target = self.at - self.eye;
        let direction = to_target.normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }
        let step = direction * offset;
        if !move_target && offset >= to_target.length() - MIN_EYE_DISTANCE {
            return false;
        }
        self.eye += step;
        if move_target {
            self.at += step;
        }
        true
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    /// Standard OpenGL-convention perspective (clip depth in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fovy_is_clamped() {
        let mut camera = Camera::default();
        camera.set_fovy(500.0);
        assert_eq!(camera.fovy(), MAX_FOVY);
        camera.set_fovy(-3.0);
        assert_eq!(camera.fovy(), MIN_FOVY);
    }

    #[test]
    fn clip_planes_keep_minimum_separation() {
        let mut camera = Camera::default();
        for value in [0.1, 5.0, 19.8, 20.0, 25.0, 0.3, 12.0] {
            camera.set_near(value);
            assert!(camera.far() - camera.near() >= MIN_DEPTH_RANGE - 1e-6);
            camera.set_far(value);
            assert!(camera.far() - camera.near() >= MIN_DEPTH_RANGE - 1e-6);
        }
    }

    #[test]
    fn near_edit_is_limited_by_far() {
        let mut camera = Camera::default();
        camera.set_far(2.0);
        camera.set_near(1.9);
        assert!((camera.near() - 1.5).abs() < 1e-6);
        camera.set_far(0.2);
        assert!((camera.far() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_updates_aspect_and_ignores_zero_sizes() {
        let mut camera = Camera::default();
        camera.set_viewport(1600, 800);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_viewport(0, 800);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn zoom_scales_fovy_within_limits() {
        let mut camera = Camera::default();
        camera.zoom(0.9);
        assert!((camera.fovy() - 40.5).abs() < 1e-4);
        camera.zoom(100.0);
        assert_eq!(camera.fovy(), MAX_FOVY);
    }

    #[test]
    fn dolly_with_target_translates_both_points() {
        let mut camera = Camera::default();
        assert!(camera.dolly(1.0, true));
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-6));
        assert!(camera.at.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn dolly_never_passes_the_target() {
        let mut camera = Camera::default();
        assert!(camera.dolly(4.0, false));
        assert!(!camera.dolly(1.0, false));
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
        assert!(camera.dolly(-2.0, false));
        assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
    }
}
