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

//! [`PolygonSet`]: geometry buffers validated against a technique, with a
//! precomputed per-pass binding plan.

use ahash::AHashMap;
use enginex_core::math::{Mat4, Vec3};
use enginex_core::renderer::{
    BindingError, ContentType, GraphicsDevice, IndexFormat, InputElementDescription,
    InputLayoutId, PassId, PrimitiveTopology, RenderError, VertexBufferBinding,
};
use std::sync::Arc;

use super::buffer::GeometryBuffer;
use super::input_layout_cache::InputLayoutCache;
use super::mesh::MeshData;
use super::transform::Transform;
use crate::effects::{EffectManager, Material, Pass, Technique};
use crate::queue::{RenderContext, RenderType, Renderable};

/// How one pass reads the vertex buffers of a [`PolygonSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassBinding {
    /// The pass this record binds for.
    pub pass: PassId,
    /// Indices into the vertex buffers, in slot order.
    pub buffer_indices: Vec<usize>,
    /// Byte offset per bound buffer. Always zero; sub-range binding is not supported.
    pub offsets: Vec<u32>,
    /// Element stride per bound buffer.
    pub strides: Vec<u32>,
    /// The input layout matching the pass signature.
    pub layout: InputLayoutId,
    /// Vertices drawn by a non-indexed draw.
    pub vertex_count: u32,
}

/// A set of geometry buffers drawn with one technique.
///
/// The binding plan is rebuilt whenever the buffers or the technique change,
/// and stays empty until both are set and consistent. Cloning shares the
/// geometry buffers.
#[derive(Debug, Clone)]
pub struct PolygonSet {
    layouts: Arc<InputLayoutCache>,
    vertex_buffers: Vec<Arc<GeometryBuffer>>,
    index_buffer: Option<Arc<GeometryBuffer>>,
    topology: PrimitiveTopology,
    effect: Option<(String, String)>,
    technique: Option<Arc<Technique>>,
    material: Option<Material>,
    transform: Transform,
    render_type: RenderType,
    binding_plan: Vec<PassBinding>,
}

impl PolygonSet {
    /// Creates an empty, opaque polygon set.
    pub fn new(layouts: Arc<InputLayoutCache>) -> Self {
        Self {
            layouts,
            vertex_buffers: Vec::new(),
            index_buffer: None,
            topology: PrimitiveTopology::default(),
            effect: None,
            technique: None,
            material: None,
            transform: Transform::default(),
            render_type: RenderType::Opaque,
            binding_plan: Vec::new(),
        }
    }

    /// Sets the bucket this set is queued in.
    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = render_type;
        self
    }

    /// Uploads `mesh`, binds it to `technique` of `effect` and fills the
    /// material from the mesh's material description.
    pub fn from_mesh(
        layouts: Arc<InputLayoutCache>,
        effects: &EffectManager,
        mesh: &MeshData,
        effect: &str,
        technique: &str,
    ) -> Result<Self, BindingError> {
        let buffers = mesh.create_buffers(effects.device())?;
        let mut set = Self::new(layouts);
        set.set_buffers(buffers, PrimitiveTopology::TriangleList)?;
        set.set_effect_name(effects, effect, technique)?;
        if let Some(material) = set.material.as_mut() {
            mesh.material.apply_to(material)?;
        }
        Ok(set)
    }

    /// Replaces the geometry.
    ///
    /// `buffers` may hold at most one index buffer; every other buffer is a
    /// per-vertex stream and all of them must have the same element count.
    /// On error the previous geometry is kept.
    pub fn set_buffers(
        &mut self,
        buffers: Vec<Arc<GeometryBuffer>>,
        topology: PrimitiveTopology,
    ) -> Result<(), BindingError> {
        let mut index_buffer = None;
        // Vertex buffers paired with their position in `buffers`.
        let mut vertex_buffers = Vec::with_capacity(buffers.len());

        for (index, buffer) in buffers.into_iter().enumerate() {
            if buffer.content_type() == ContentType::Index {
                if index_buffer.replace(buffer).is_some() {
                    return Err(BindingError::MultipleIndexBuffers);
                }
            } else if buffer.is_per_instance() {
                return Err(BindingError::PerInstanceVertexBuffer { index });
            } else {
                vertex_buffers.push((index, buffer));
            }
        }

        let expected = vertex_buffers
            .first()
            .ok_or(BindingError::NoVertexBuffer)?
            .1
            .element_count();
        if let Some((index, buffer)) = vertex_buffers
            .iter()
            .find(|(_, b)| b.element_count() != expected)
        {
            return Err(BindingError::ElementCountMismatch {
                expected,
                found: buffer.element_count(),
                index: *index,
            });
        }

        self.vertex_buffers = vertex_buffers.into_iter().map(|(_, b)| b).collect();
        self.index_buffer = index_buffer;
        self.topology = topology;
        self.rebuild_binding_plan()
    }

    /// Selects `technique` of `effect`.
    ///
    /// A blank material is created when none is set or the current one
    /// belongs to another effect. When the technique cannot be bound to the
    /// current buffers, the set is left as it was.
    pub fn set_effect_name(
        &mut self,
        effects: &EffectManager,
        effect: &str,
        technique: &str,
    ) -> Result<(), BindingError> {
        let resolved = effects.technique(effect, technique)?;
        let plan = self.build_binding_plan(&resolved)?;
        let keeps_material = self
            .material
            .as_ref()
            .is_some_and(|m| m.effect_name() == effect);
        if !keeps_material {
            self.material = Some(effects.effect(effect)?.create_material());
        }

        self.technique = Some(resolved);
        self.effect = Some((effect.to_string(), technique.to_string()));
        self.binding_plan = plan;
        Ok(())
    }

    /// Rebuilds the plan after the buffers changed. On a matching error the
    /// plan is left empty.
    fn rebuild_binding_plan(&mut self) -> Result<(), BindingError> {
        self.binding_plan.clear();
        let Some(technique) = self.technique.clone() else {
            return Ok(());
        };
        self.binding_plan = self.build_binding_plan(&technique)?;
        Ok(())
    }

    /// Matches every pass signature of `technique` against the buffers.
    ///
    /// Having no buffers yet is not an error; the plan is simply empty.
    fn build_binding_plan(
        &self,
        technique: &Technique,
    ) -> Result<Vec<PassBinding>, BindingError> {
        if self.vertex_buffers.is_empty() {
            return Ok(Vec::new());
        }

        let plan = technique
            .passes()
            .iter()
            .map(|pass| self.bind_pass(pass))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "PolygonSet: bound {} buffers to technique '{}' ({} passes)",
            self.vertex_buffers.len(),
            technique.name(),
            plan.len()
        );
        Ok(plan)
    }

    fn bind_pass(&self, pass: &Pass) -> Result<PassBinding, BindingError> {
        let mut available: Vec<usize> = (0..self.vertex_buffers.len()).collect();
        // Next semantic index expected per semantic name.
        let mut provided: AHashMap<String, u32> = AHashMap::new();
        let mut buffer_indices = Vec::new();
        let mut elements = Vec::new();

        for requirement in pass.input_signature() {
            let key = requirement.semantic_name.to_ascii_uppercase();
            let next = provided.get(&key).copied().unwrap_or(0);
            if requirement.semantic_index < next {
                // Already fed by a buffer spanning several input elements.
                continue;
            }
            if requirement.semantic_index > next {
                return Err(BindingError::SemanticOutOfOrder {
                    pass: pass.name().to_string(),
                    semantic: requirement.semantic_name.clone(),
                    index: requirement.semantic_index,
                });
            }

            let position = available
                .iter()
                .position(|&i| {
                    self.vertex_buffers[i]
                        .content_type()
                        .satisfies(&requirement.semantic_name)
                })
                .ok_or_else(|| BindingError::UnsatisfiedSemantic {
                    pass: pass.name().to_string(),
                    semantic: requirement.semantic_name.clone(),
                    index: requirement.semantic_index,
                })?;
            let buffer_index = available.remove(position);

            let slot = buffer_indices.len() as u32;
            let expanded = InputElementDescription::for_content(
                self.vertex_buffers[buffer_index].content_type(),
                requirement.semantic_index,
                slot,
                false,
                0,
            )?;
            provided.insert(key, requirement.semantic_index + expanded.len() as u32);
            elements.extend(expanded);
            buffer_indices.push(buffer_index);
        }

        let layout = self.layouts.get_or_create(&elements, pass)?;
        let vertex_count = buffer_indices
            .first()
            .map(|&i| &self.vertex_buffers[i])
            .or(self.vertex_buffers.first())
            .map_or(0, |b| b.element_count());

        Ok(PassBinding {
            pass: pass.id(),
            offsets: vec![0; buffer_indices.len()],
            strides: buffer_indices
                .iter()
                .map(|&i| self.vertex_buffers[i].stride())
                .collect(),
            buffer_indices,
            layout,
            vertex_count,
        })
    }

    /// Replaces the material.
    pub fn set_material(&mut self, material: Material) {
        self.material = Some(material);
    }

    /// Removes the material, leaving the set undrawable until a new one is set.
    pub fn take_material(&mut self) -> Option<Material> {
        self.material.take()
    }

    /// The material, if any.
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// The material, for editing.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.material.as_mut()
    }

    /// One record per pass; empty until buffers and technique are validated.
    pub fn binding_plan(&self) -> &[PassBinding] {
        &self.binding_plan
    }

    /// Returns `true` if the set can be drawn.
    pub fn is_validated(&self) -> bool {
        !self.binding_plan.is_empty()
    }

    /// The selected technique, if any.
    pub fn technique(&self) -> Option<&Arc<Technique>> {
        self.technique.as_ref()
    }

    /// The primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// The world transform.
    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    /// The world transform, for editing.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The per-vertex streams.
    pub fn vertex_buffers(&self) -> &[Arc<GeometryBuffer>] {
        &self.vertex_buffers
    }

    /// The index buffer, if any.
    pub fn index_buffer(&self) -> Option<&Arc<GeometryBuffer>> {
        self.index_buffer.as_ref()
    }
}

impl Renderable for PolygonSet {
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        if self.binding_plan.is_empty() {
            return Err(RenderError::NotValidated);
        }
        let material = self.material.as_ref().ok_or(RenderError::NoMaterial)?;
        let Some((effect_name, _)) = &self.effect else {
            return Err(RenderError::NotValidated);
        };

        let device = ctx.effects.device().clone();
        let effect = ctx.effects.effect_mut(effect_name)?;
        effect.set_world_matrix(&self.transform.to_mat4())?;
        effect.set_material(material)?;

        device.set_primitive_topology(self.topology);
        for binding in &self.binding_plan {
            device.set_input_layout(binding.layout)?;
            let streams: Vec<VertexBufferBinding> = binding
                .buffer_indices
                .iter()
                .zip(binding.strides.iter().zip(&binding.offsets))
                .map(|(&i, (&stride, &offset))| VertexBufferBinding {
                    buffer: self.vertex_buffers[i].id(),
                    stride,
                    offset,
                })
                .collect();
            device.set_vertex_buffers(0, &streams)?;

            match &self.index_buffer {
                Some(indices) => {
                    device.set_index_buffer(indices.id(), IndexFormat::Uint32, 0)?;
                    device.apply_pass(binding.pass)?;
                    device.draw_indexed(indices.element_count(), 0, 0);
                }
                None => {
                    device.apply_pass(binding.pass)?;
                    device.draw(binding.vertex_count, 0);
                }
            }
        }
        Ok(())
    }

    fn render_type(&self) -> RenderType {
        self.render_type
    }

    fn transform(&self) -> Mat4 {
        self.transform.to_mat4()
    }

    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn effect_name(&self) -> Option<(&str, &str)> {
        self.effect
            .as_ref()
            .map(|(effect, technique)| (effect.as_str(), technique.as_str()))
    }

    fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }
}
