use glam::Vec4;

use crate::lighting::{normalize_rgb, Rgb};

pub const MIN_SHININESS: f32 = 1.0;
pub const MAX_SHININESS: f32 = 500.0;

/// Interchangeable lighting programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderVariant {
    /// Per-fragment lighting.
    #[default]
    Phong,
    /// Per-vertex lighting, interpolated across the triangle.
    Gouraud,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 2] = [ShaderVariant::Phong, ShaderVariant::Gouraud];

    pub fn label(self) -> &'static str {
        match self {
            ShaderVariant::Phong => "phong",
            ShaderVariant::Gouraud => "gouraud",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.label().eq_ignore_ascii_case(name))
    }

    pub fn toggled(self) -> Self {
        match self {
            ShaderVariant::Phong => ShaderVariant::Gouraud,
            ShaderVariant::Gouraud => ShaderVariant::Phong,
        }
    }
}

/// Surface reflectance in the 0–255 authoring range.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    shininess: f32,
    pub shader: ShaderVariant,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [150, 150, 150],
            diffuse: [150, 150, 150],
            specular: [200, 200, 200],
            shininess: 100.0,
            shader: ShaderVariant::Phong,
        }
    }
}

impl Material {
    /// Dull grey used for the ground plane.
    pub fn ground() -> Self {
        Self {
            ambient: [60, 60, 60],
            diffuse: [110, 110, 110],
            specular: [20, 20, 20],
            shininess: 4.0,
            shader: ShaderVariant::Phong,
        }
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.clamp(MIN_SHININESS, MAX_SHININESS);
    }

    /// Normalized reflectances; the specular term carries the shininess in `w`.
    pub fn coefficients(&self) -> [Vec4; 3] {
        [
            normalize_rgb(self.ambient).extend(1.0),
            normalize_rgb(self.diffuse).extend(1.0),
            normalize_rgb(self.specular).extend(self.shininess),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shininess_is_clamped() {
        let mut material = Material::default();
        material.set_shininess(0.0);
        assert_eq!(material.shininess(), MIN_SHININESS);
        material.set_shininess(10_000.0);
        assert_eq!(material.shininess(), MAX_SHININESS);
    }

    #[test]
    fn coefficients_normalize_and_pack_shininess() {
        let material = Material::default();
        let [ka, _, ks] = material.coefficients();
        assert_eq!(ka.x, 150.0 / 255.0);
        assert_eq!(ks.w, 100.0);
    }

    #[test]
    fn variants_parse_by_name() {
        assert_eq!(ShaderVariant::from_name("Gouraud"), Some(ShaderVariant::Gouraud));
        assert_eq!(ShaderVariant::from_name("flat"), None);
        assert_eq!(ShaderVariant::Phong.toggled(), ShaderVariant::Gouraud);
    }
}
