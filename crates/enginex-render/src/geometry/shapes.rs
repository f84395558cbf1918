// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Procedurally generated meshes.

use enginex_core::math::{Vec2, Vec3, PI, TAU};
use enginex_core::renderer::GeometryError;

use super::mesh::MeshData;

/// Generates a `width` x `height` quad in the XY plane, facing `+Z`.
pub fn generate_quad(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    MeshData {
        positions: vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        uv_sets: vec![vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ]],
        indices: vec![0, 1, 2, 0, 2, 3],
        ..Default::default()
    }
}

/// Generates a UV sphere centered on the origin.
///
/// `segments` is the number of slices around the Y axis; the sphere has
/// `segments / 2` bands from pole to pole. With `flip_normals` the normals
/// point inwards and the winding is reversed, for skies viewed from inside.
///
/// # Errors
/// [`GeometryError::InvalidShape`] if `segments < 3` or `radius <= 0`.
pub fn generate_sphere(
    radius: f32,
    segments: u32,
    flip_normals: bool,
) -> Result<MeshData, GeometryError> {
    if segments < 3 {
        return Err(GeometryError::InvalidShape(format!(
            "a sphere needs at least 3 segments, got {segments}"
        )));
    }
    if radius <= 0.0 {
        return Err(GeometryError::InvalidShape(format!(
            "sphere radius must be positive, got {radius}"
        )));
    }

    let bands = segments / 2;
    let columns = segments + 1;
    let vertex_count = ((bands + 1) * columns) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for ring in 0..=bands {
        let v = ring as f32 / bands as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for column in 0..columns {
            let u = column as f32 / segments as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, -sin_theta * sin_phi);
            positions.push(normal * radius);
            normals.push(if flip_normals { -normal } else { normal });
            uvs.push(Vec2::new(u, v));
        }
    }

    let mut indices = Vec::with_capacity((bands * segments * 6) as usize);
    for ring in 0..bands {
        for column in 0..segments {
            let a = ring * columns + column;
            let b = a + columns;
            if flip_normals {
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            } else {
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
    }

    Ok(MeshData {
        positions,
        normals,
        uv_sets: vec![uvs],
        indices,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quad_layout() {
        let quad = generate_quad(2.0, 4.0);
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(quad.positions[2], Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(quad.uv_sets.len(), 1);
    }

    #[test]
    fn test_sphere_counts() {
        let sphere = generate_sphere(1.0, 16, false).unwrap();
        assert_eq!(sphere.vertex_count(), 9 * 17);
        assert_eq!(sphere.indices.len(), 8 * 16 * 6);
        assert!(sphere
            .indices
            .iter()
            .all(|&i| (i as usize) < sphere.vertex_count()));
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let sphere = generate_sphere(2.5, 8, false).unwrap();
        for p in &sphere.positions {
            assert_relative_eq!(p.length(), 2.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_flipped_sphere_normals_point_inwards() {
        let sphere = generate_sphere(1.0, 6, true).unwrap();
        for (p, n) in sphere.positions.iter().zip(&sphere.normals) {
            assert!(p.dot(*n) < 0.0);
        }
    }

    #[test]
    fn test_invalid_sphere_parameters() {
        assert!(matches!(
            generate_sphere(1.0, 2, false),
            Err(GeometryError::InvalidShape(_))
        ));
        assert!(matches!(
            generate_sphere(0.0, 8, false),
            Err(GeometryError::InvalidShape(_))
        ));
    }
}
