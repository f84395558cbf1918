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

//! The interface mesh importers fill in: raw vertex streams plus a material
//! description.

use enginex_core::math::{LinearRgba, Vec2, Vec3};
use enginex_core::renderer::{GeometryError, GraphicsDevice, MaterialError};
use std::sync::Arc;

use super::buffer::GeometryBuffer;
use crate::effects::Material;

/// How one lighting channel of a mesh material is sourced.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialChannel {
    /// A constant color.
    Color(LinearRgba),
    /// A texture, by registry name.
    Texture(String),
}

/// The lighting channels an imported mesh describes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshMaterialDescription {
    /// Ambient reflectance.
    pub ambient: MaterialChannel,
    /// Emitted light.
    pub emissive: MaterialChannel,
    /// Diffuse reflectance.
    pub diffuse: MaterialChannel,
    /// Specular reflectance.
    pub specular: MaterialChannel,
    /// Shininess of the specular highlight.
    pub specular_exponent: f32,
}

impl Default for MeshMaterialDescription {
    fn default() -> Self {
        Self {
            ambient: MaterialChannel::Color(LinearRgba::BLACK),
            emissive: MaterialChannel::Color(LinearRgba::BLACK),
            diffuse: MaterialChannel::Color(LinearRgba::WHITE),
            specular: MaterialChannel::Color(LinearRgba::WHITE),
            specular_exponent: 32.0,
        }
    }
}

impl MeshMaterialDescription {
    /// Writes the channels into `material`.
    ///
    /// Each channel `c` sets either `cTexture` with `cMapped = true`, or
    /// `cColor` with `cMapped = false`. The effect behind `material` must
    /// declare all of them, as well as `specularExponent`.
    pub fn apply_to(&self, material: &mut Material) -> Result<(), MaterialError> {
        let channels = [
            ("ambient", &self.ambient),
            ("emissive", &self.emissive),
            ("diffuse", &self.diffuse),
            ("specular", &self.specular),
        ];
        for (channel, source) in channels {
            match source {
                MaterialChannel::Texture(texture) => {
                    material.set_texture_name(&format!("{channel}Texture"), texture.as_str())?;
                    material.set_bool(&format!("{channel}Mapped"), true)?;
                }
                MaterialChannel::Color(color) => {
                    material.set_float4(&format!("{channel}Color"), *color)?;
                    material.set_bool(&format!("{channel}Mapped"), false)?;
                }
            }
        }
        material.set_float("specularExponent", self.specular_exponent)
    }
}

/// Vertex streams of one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Object-space positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals; empty if the mesh has none.
    pub normals: Vec<Vec3>,
    /// Texture coordinate sets, bound as `TEXCOORD0`, `TEXCOORD1`, ...
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Triangle-list indices; empty for non-indexed meshes.
    pub indices: Vec<u32>,
    /// The imported material.
    pub material: MeshMaterialDescription,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles, counting indices when present.
    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }

    /// Uploads every non-empty stream: positions, normals, each UV set, then
    /// indices.
    pub fn create_buffers(
        &self,
        device: &Arc<dyn GraphicsDevice>,
    ) -> Result<Vec<Arc<GeometryBuffer>>, GeometryError> {
        let mut buffers = vec![Arc::new(GeometryBuffer::from_positions(
            device.clone(),
            &self.positions,
        )?)];
        if !self.normals.is_empty() {
            buffers.push(Arc::new(GeometryBuffer::from_normals(
                device.clone(),
                &self.normals,
            )?));
        }
        for uvs in &self.uv_sets {
            buffers.push(Arc::new(GeometryBuffer::from_tex_coords(
                device.clone(),
                uvs,
            )?));
        }
        if !self.indices.is_empty() {
            buffers.push(Arc::new(GeometryBuffer::from_indices(
                device.clone(),
                &self.indices,
            )?));
        }
        Ok(buffers)
    }
}
