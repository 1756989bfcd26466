//! Wavefront OBJ loading for the "model" slot.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use thiserror::Error;

use crate::shapes::{Geometry, VERTEX_STRIDE};

#[derive(Debug, Error, PartialEq)]
pub enum ObjError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("face references vertex {index} but only {count} are defined")]
    IndexOutOfRange { index: i32, count: usize },
    #[error("OBJ data does not define any faces")]
    Empty,
}

/// Reads an OBJ file and rescales it into the unit box used by the primitives.
pub fn load_obj(path: &Path) -> anyhow::Result<Geometry> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    let mut geometry =
        parse_obj(&data).with_context(|| format!("failed to parse OBJ mesh {}", path.display()))?;
    fit_unit_box(&mut geometry);
    Ok(geometry)
}

/// Parses OBJ text into interleaved geometry. Polygons are fan-triangulated and
/// missing normals are replaced by smoothed face normals.
pub fn parse_obj(data: &str) -> Result<Geometry, ObjError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut triangles: Vec<[Corner; 3]> = Vec::new();

    for (index, line) in data.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(parse_vec3(parts, line_no)?),
            Some("vn") => normals.push(parse_vec3(parts, line_no)?),
            Some("f") => {
                let polygon = parse_face(parts, line_no, positions.len(), normals.len())?;
                for i in 1..polygon.len() - 1 {
                    triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if triangles.is_empty() {
        return Err(ObjError::Empty);
    }

    let mut geometry = Geometry::default();
    let mut lookup: HashMap<(usize, Option<usize>), u32> = HashMap::new();
    let mut missing_normals = false;
    for &Corner { position, normal } in triangles.iter().flatten() {
        missing_normals |= normal.is_none();
        let next = geometry.vertex_count() as u32;
        let entry = *lookup.entry((position, normal)).or_insert_with(|| {
            let p = positions[position];
            let n = normal.map(|i| normals[i]).unwrap_or(Vec3::ZERO);
            geometry.vertices.extend_from_slice(&p.to_array());
            geometry.vertices.extend_from_slice(&n.to_array());
            next
        });
        geometry.indices.push(entry);
    }

    if missing_normals {
        smooth_normals(&mut geometry);
    }
    Ok(geometry)
}

/// Recentres the geometry on the origin and scales its largest extent to 1.
pub fn fit_unit_box(geometry: &mut Geometry) {
    let count = geometry.vertex_count();
    if count == 0 {
        return;
    }
    let (min, max) = (0..count).map(|i| geometry.position(i)).fold(
        (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(p), max.max(p)),
    );
    let center = (min + max) * 0.5;
    let extent = (max - min).max_element();
    let scale = if extent > f32::EPSILON { 1.0 / extent } else { 1.0 };
    for vertex in geometry.vertices.chunks_exact_mut(VERTEX_STRIDE) {
        let p = (Vec3::from_slice(&vertex[..3]) - center) * scale;
        vertex[..3].copy_from_slice(&p.to_array());
    }
}

/// Face corner with indices already resolved to 0-based offsets.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    normal: Option<usize>,
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, ObjError> {
    let mut component = || -> Result<f32, ObjError> {
        let token = parts.next().ok_or_else(|| ObjError::Syntax {
            line,
            message: "missing vector component".to_string(),
        })?;
        token.parse::<f32>().map_err(|err| ObjError::Syntax {
            line,
            message: format!("invalid number {token:?}: {err}"),
        })
    };
    Ok(Vec3::new(component()?, component()?, component()?))
}

/// Parses an `f` line. Relative indices count back from the vertices and
/// normals defined so far, so they are resolved here rather than at the end.
fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
    position_count: usize,
    normal_count: usize,
) -> Result<Vec<Corner>, ObjError> {
    let syntax = |message: String| ObjError::Syntax { line, message };
    let mut corners = Vec::new();
    for part in parts {
        let mut segments = part.split('/');
        let position = segments
            .next()
            .unwrap_or_default()
            .parse::<i32>()
            .map_err(|err| syntax(format!("invalid vertex index {part:?}: {err}")))?;
        let _texcoord = segments.next();
        let normal = match segments.next() {
            Some(raw) if !raw.is_empty() => Some(
                raw.parse::<i32>()
                    .map_err(|err| syntax(format!("invalid normal index {part:?}: {err}")))?,
            ),
            _ => None,
        };
        corners.push(Corner {
            position: resolve(position, position_count)?,
            normal: normal.map(|raw| resolve(raw, normal_count)).transpose()?,
        });
    }
    if corners.len() < 3 {
        return Err(syntax("faces must reference at least 3 vertices".to_string()));
    }
    Ok(corners)
}

/// Converts a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve(index: i32, count: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 {
        Some(index as usize - 1).filter(|&i| i < count)
    } else if index < 0 {
        count.checked_sub(index.unsigned_abs() as usize)
    } else {
        None
    };
    resolved.ok_or(ObjError::IndexOutOfRange { index, count })
}

fn smooth_normals(geometry: &mut Geometry) {
    let mut accum = vec![Vec3::ZERO; geometry.vertex_count()];
    for triangle in geometry.indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let p0 = geometry.position(i0);
        let face = (geometry.position(i1) - p0).cross(geometry.position(i2) - p0);
        if face.length_squared() > f32::EPSILON {
            let face = face.normalize();
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }
    }
    for (vertex, normal) in geometry.vertices.chunks_exact_mut(VERTEX_STRIDE).zip(accum) {
        if Vec3::from_slice(&vertex[3..]) == Vec3::ZERO {
            vertex[3..].copy_from_slice(&normal.normalize_or_zero().to_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triangle_and_computes_normals() {
        let obj = "\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let geometry = parse_obj(obj).unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        assert_eq!(geometry.vertex_count(), 3);
        for index in 0..3 {
            assert!(geometry.normal(index).abs_diff_eq(Vec3::Z, 1e-5));
        }
    }

    #[test]
    fn quads_are_fan_triangulated_and_vertices_shared() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        let geometry = parse_obj(obj).unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(geometry.vertex_count(), 4);
    }

    #[test]
    fn negative_indices_are_relative() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        assert_eq!(parse_obj(obj).unwrap().indices, vec![0, 1, 2]);
    }

    #[test]
    fn negative_indices_count_back_from_the_face_line() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\nv 6 5 5\nv 5 6 5\nf -3 -2 -1\n";
        let geometry = parse_obj(obj).unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(geometry.position(0), Vec3::ZERO);
        assert_eq!(geometry.position(2), Vec3::Y);
        assert_eq!(geometry.position(3), Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(geometry.position(5), Vec3::new(5.0, 6.0, 5.0));
    }

    #[test]
    fn reports_line_numbers_and_bad_indices() {
        let err = parse_obj("v 0 0\n").unwrap_err();
        assert!(matches!(err, ObjError::Syntax { line: 1, .. }));
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap_err();
        assert_eq!(err, ObjError::IndexOutOfRange { index: 9, count: 3 });
        assert_eq!(parse_obj("v 0 0 0\n").unwrap_err(), ObjError::Empty);
    }

    #[test]
    fn fit_unit_box_recentres_and_scales() {
        let obj = "v 10 10 10\nv 14 10 10\nv 10 12 10\nf 1 2 3\n";
        let mut geometry = parse_obj(obj).unwrap();
        fit_unit_box(&mut geometry);
        assert!(geometry.position(0).abs_diff_eq(Vec3::new(-0.5, -0.25, 0.0), 1e-5));
        assert!(geometry.position(1).abs_diff_eq(Vec3::new(0.5, -0.25, 0.0), 1e-5));
    }
}
