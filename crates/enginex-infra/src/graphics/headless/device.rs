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

//! The headless [`GraphicsDevice`] implementation.

use enginex_core::math::{Mat4, Vec4};
use enginex_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, EffectDefinition, GraphicsDevice, IndexFormat,
    InputElementDescription, InputLayoutId, ParameterHandle, ParameterKind, PassId,
    PrimitiveTopology, ReflectedParameter, ReflectedPass, ReflectedTechnique, ResourceError,
    ShaderError, ShaderProgramDescriptor, ShaderProgramId, ShaderProgramSource,
    ShaderReflection, SignatureParameter, TextureId, VertexBufferBinding,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::command::{BoundValue, DeviceStats, RecordedCommand};
use crate::effects::load_effect_definition;

#[derive(Debug)]
struct BufferEntry {
    usage: BufferUsage,
    data: Vec<u8>,
}

#[derive(Debug)]
struct ParameterEntry {
    kind: ParameterKind,
    value: BoundValue,
}

#[derive(Debug, Default)]
struct HeadlessState {
    buffers: HashMap<BufferId, BufferEntry>,
    programs: HashMap<ShaderProgramId, String>,
    parameters: HashMap<ParameterHandle, ParameterEntry>,
    passes: HashMap<PassId, Vec<SignatureParameter>>,
    layouts: HashMap<InputLayoutId, Vec<InputElementDescription>>,
    commands: Vec<RecordedCommand>,
    stats: DeviceStats,
}

/// A [`GraphicsDevice`] that validates and records commands instead of
/// submitting them to a GPU.
///
/// Handles of every kind are unique across the whole device.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<HeadlessState>,
    next_id: AtomicUsize,
}

impl HeadlessDevice {
    /// Creates a device with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn generate_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Every command issued since creation or the last [`clear_commands`](Self::clear_commands).
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.lock().commands.clone()
    }

    /// Only the draw commands, in issue order.
    pub fn draw_commands(&self) -> Vec<RecordedCommand> {
        self.lock()
            .commands
            .iter()
            .filter(|c| c.is_draw())
            .cloned()
            .collect()
    }

    /// Forgets the recorded commands. Counters are kept.
    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }

    /// The accumulated counters.
    pub fn stats(&self) -> DeviceStats {
        self.lock().stats
    }

    /// Resets every counter to zero.
    pub fn reset_stats(&self) {
        self.lock().stats = DeviceStats::default();
    }

    /// The value a parameter currently holds.
    pub fn parameter_value(&self, handle: ParameterHandle) -> Option<BoundValue> {
        self.lock()
            .parameters
            .get(&handle)
            .map(|entry| entry.value.clone())
    }

    /// Number of recorded writes to `handle`.
    pub fn writes_to(&self, handle: ParameterHandle) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|c| matches!(c, RecordedCommand::SetParameter { handle: h, .. } if *h == handle))
            .count()
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.lock().buffers.len()
    }

    /// A copy of a buffer's contents.
    pub fn buffer_data(&self, id: BufferId) -> Option<Vec<u8>> {
        self.lock().buffers.get(&id).map(|entry| entry.data.clone())
    }

    fn compile(
        &self,
        state: &mut HeadlessState,
        label: &str,
        definition: EffectDefinition,
    ) -> Result<ShaderReflection, ShaderError> {
        let compilation_error = |details: String| ShaderError::CompilationError {
            label: label.to_string(),
            details,
        };

        let mut names = HashSet::new();
        for parameter in &definition.parameters {
            if !names.insert(parameter.name.as_str()) {
                return Err(compilation_error(format!(
                    "parameter '{}' is declared twice",
                    parameter.name
                )));
            }
            let default_kind = parameter.default_value().kind();
            if default_kind != parameter.kind {
                return Err(compilation_error(format!(
                    "parameter '{}' is declared {} but its default is {}",
                    parameter.name, parameter.kind, default_kind
                )));
            }
        }
        let mut technique_names = HashSet::new();
        for technique in &definition.techniques {
            if !technique_names.insert(technique.name.as_str()) {
                return Err(compilation_error(format!(
                    "technique '{}' is declared twice",
                    technique.name
                )));
            }
        }

        let program = ShaderProgramId(self.generate_id());
        let parameters = definition
            .parameters
            .into_iter()
            .map(|parameter| {
                let handle = ParameterHandle(self.generate_id());
                let default = parameter.default_value();
                state.parameters.insert(
                    handle,
                    ParameterEntry {
                        kind: parameter.kind,
                        value: BoundValue::initial(&default),
                    },
                );
                ReflectedParameter {
                    name: parameter.name,
                    handle,
                    default,
                }
            })
            .collect();

        let techniques = definition
            .techniques
            .into_iter()
            .map(|technique| ReflectedTechnique {
                name: technique.name,
                passes: technique
                    .passes
                    .into_iter()
                    .map(|pass| {
                        let id = PassId(self.generate_id());
                        state.passes.insert(id, pass.inputs.clone());
                        ReflectedPass {
                            id,
                            name: pass.name,
                            input_signature: pass.inputs,
                        }
                    })
                    .collect(),
            })
            .collect();

        state.programs.insert(program, label.to_string());
        Ok(ShaderReflection {
            program,
            parameters,
            techniques,
        })
    }

    fn set_parameter(&self, handle: ParameterHandle, value: BoundValue) -> Result<(), ResourceError> {
        let mut state = self.lock();
        let entry = state
            .parameters
            .get_mut(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        if entry.kind != value.kind() {
            return Err(ResourceError::BackendError(format!(
                "parameter {:?} is a {} but a {} was written",
                handle,
                entry.kind,
                value.kind()
            )));
        }
        entry.value = value.clone();
        state.stats.parameter_writes += 1;
        state
            .commands
            .push(RecordedCommand::SetParameter { handle, value });
        Ok(())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if data.len() as u64 != descriptor.size() {
            return Err(ResourceError::BackendError(format!(
                "buffer '{}' declares {} bytes but {} were provided",
                descriptor.label.as_deref().unwrap_or_default(),
                descriptor.size(),
                data.len()
            )));
        }

        let id = BufferId(self.generate_id());
        let size = data.len() as u64;
        let mut state = self.lock();
        state.buffers.insert(
            id,
            BufferEntry {
                usage: descriptor.usage,
                data: data.to_vec(),
            },
        );
        state.stats.buffers_created += 1;
        state.stats.bytes_uploaded += size;
        state.commands.push(RecordedCommand::CreateBuffer {
            id,
            usage: descriptor.usage,
            size,
        });

        log::debug!(
            "HeadlessDevice: Created buffer '{}' with ID {:?}, size: {} bytes",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            size
        );
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut state = self.lock();
        let entry = state.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        if !entry.usage.contains(BufferUsage::CPU_WRITE) {
            return Err(ResourceError::BackendError(format!(
                "buffer {id:?} is not CPU-writable"
            )));
        }
        let start = offset as usize;
        let end = start + data.len();
        let target = entry
            .data
            .get_mut(start..end)
            .ok_or(ResourceError::OutOfBounds)?;
        target.copy_from_slice(data);

        let size = data.len() as u64;
        state.stats.bytes_uploaded += size;
        state
            .commands
            .push(RecordedCommand::WriteBuffer { id, offset, size });
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if state.buffers.remove(&id).is_none() {
            return Err(ResourceError::NotFound);
        }
        state.stats.buffers_destroyed += 1;
        state.commands.push(RecordedCommand::DestroyBuffer(id));
        log::debug!("HeadlessDevice: Destroyed buffer with ID: {id:?}");
        Ok(())
    }

    fn create_shader_program(
        &self,
        descriptor: &ShaderProgramDescriptor,
    ) -> Result<ShaderReflection, ResourceError> {
        let label = descriptor.label.as_deref().unwrap_or("unnamed");
        let definition = match &descriptor.source {
            ShaderProgramSource::Definition(definition) => definition.clone(),
            ShaderProgramSource::File(path) => {
                load_effect_definition(path).map_err(|e| ShaderError::LoadError {
                    path: path.display().to_string(),
                    source_error: format!("{e:#}"),
                })?
            }
        };

        let mut state = self.lock();
        let reflection = self.compile(&mut state, label, definition)?;
        state.stats.programs_created += 1;
        state
            .commands
            .push(RecordedCommand::CreateProgram(reflection.program));

        log::info!(
            "HeadlessDevice: Compiled program '{}' ({:?}) with {} parameters and {} techniques",
            label,
            reflection.program,
            reflection.parameters.len(),
            reflection.techniques.len()
        );
        Ok(reflection)
    }

    fn create_input_layout(
        &self,
        elements: &[InputElementDescription],
        pass: PassId,
    ) -> Result<InputLayoutId, ResourceError> {
        let mut state = self.lock();
        let signature = state.passes.get(&pass).ok_or(ResourceError::NotFound)?;

        for element in elements {
            let declared = signature.iter().any(|input| {
                input.semantic_name.eq_ignore_ascii_case(&element.semantic_name)
                    && input.semantic_index == element.semantic_index
            });
            if !declared {
                return Err(ResourceError::InputLayout(format!(
                    "{}{} is not part of the input signature of pass {:?}",
                    element.semantic_name, element.semantic_index, pass
                )));
            }
        }

        let id = InputLayoutId(self.generate_id());
        state.layouts.insert(id, elements.to_vec());
        state.stats.input_layouts_created += 1;
        state
            .commands
            .push(RecordedCommand::CreateInputLayout { id, pass });
        log::debug!(
            "HeadlessDevice: Created input layout {:?} with {} elements",
            id,
            elements.len()
        );
        Ok(id)
    }

    fn set_matrix(&self, handle: ParameterHandle, value: &Mat4) -> Result<(), ResourceError> {
        self.set_parameter(handle, BoundValue::Matrix(*value))
    }

    fn set_bool(&self, handle: ParameterHandle, value: bool) -> Result<(), ResourceError> {
        self.set_parameter(handle, BoundValue::Bool(value))
    }

    fn set_float(&self, handle: ParameterHandle, value: f32) -> Result<(), ResourceError> {
        self.set_parameter(handle, BoundValue::Float(value))
    }

    fn set_float4(&self, handle: ParameterHandle, value: &Vec4) -> Result<(), ResourceError> {
        self.set_parameter(handle, BoundValue::Float4(*value))
    }

    fn set_texture(
        &self,
        handle: ParameterHandle,
        texture: Option<TextureId>,
    ) -> Result<(), ResourceError> {
        self.set_parameter(handle, BoundValue::Texture(texture))
    }

    fn set_primitive_topology(&self, topology: PrimitiveTopology) {
        self.lock()
            .commands
            .push(RecordedCommand::SetPrimitiveTopology(topology));
    }

    fn set_input_layout(&self, layout: InputLayoutId) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if !state.layouts.contains_key(&layout) {
            return Err(ResourceError::NotFound);
        }
        state.commands.push(RecordedCommand::SetInputLayout(layout));
        Ok(())
    }

    fn set_vertex_buffers(
        &self,
        start_slot: u32,
        bindings: &[VertexBufferBinding],
    ) -> Result<(), ResourceError> {
        let mut state = self.lock();
        for binding in bindings {
            let entry = state
                .buffers
                .get(&binding.buffer)
                .ok_or(ResourceError::NotFound)?;
            if !entry.usage.contains(BufferUsage::VERTEX) {
                return Err(ResourceError::BackendError(format!(
                    "buffer {:?} is not a vertex buffer",
                    binding.buffer
                )));
            }
        }
        state.commands.push(RecordedCommand::SetVertexBuffers {
            start_slot,
            bindings: bindings.to_vec(),
        });
        Ok(())
    }

    fn set_index_buffer(
        &self,
        buffer: BufferId,
        format: IndexFormat,
        offset: u32,
    ) -> Result<(), ResourceError> {
        let mut state = self.lock();
        let entry = state.buffers.get(&buffer).ok_or(ResourceError::NotFound)?;
        if !entry.usage.contains(BufferUsage::INDEX) {
            return Err(ResourceError::BackendError(format!(
                "buffer {buffer:?} is not an index buffer"
            )));
        }
        state.commands.push(RecordedCommand::SetIndexBuffer {
            buffer,
            format,
            offset,
        });
        Ok(())
    }

    fn apply_pass(&self, pass: PassId) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if !state.passes.contains_key(&pass) {
            return Err(ResourceError::NotFound);
        }
        state.stats.passes_applied += 1;
        state.commands.push(RecordedCommand::ApplyPass(pass));
        Ok(())
    }

    fn draw(&self, vertex_count: u32, start_vertex: u32) {
        let mut state = self.lock();
        state.stats.draws += 1;
        state.commands.push(RecordedCommand::Draw {
            vertex_count,
            start_vertex,
        });
    }

    fn draw_indexed(&self, index_count: u32, start_index: u32, base_vertex: i32) {
        let mut state = self.lock();
        state.stats.indexed_draws += 1;
        state.commands.push(RecordedCommand::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        });
    }
}
