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

//! Defines the `GraphicsDevice` trait, the command surface the render engine
//! issues all resource creation, parameter writes and draw calls through.

use crate::math::{Mat4, Vec4};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// An abstract graphics device.
///
/// The engine never talks to a GPU API directly; it issues state changes and
/// draws through this trait so it can be retargeted to any backend. Methods
/// take `&self` and implementations use interior mutability, so a device can
/// be shared as `Arc<dyn GraphicsDevice>` by every buffer, effect and cache.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a buffer and initializes it with `data`.
    /// ## Arguments
    /// * `descriptor` - The buffer configuration. `descriptor.size()` must equal `data.len()`.
    /// * `data` - The initial contents.
    /// ## Returns
    /// The ID of the created buffer.
    /// ## Errors
    /// * `ResourceError` - If the size does not match or the backend fails.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Overwrites part of a buffer created with [`BufferUsage::CPU_WRITE`].
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If `offset + data.len()` exceeds the buffer size.
    /// * `ResourceError::NotFound` - If the buffer does not exist.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a buffer.
    /// ## Errors
    /// * `ResourceError::NotFound` - If the buffer does not exist.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Compiles a shader program and reports its parameters and techniques.
    /// ## Arguments
    /// * `descriptor` - Where to compile the program from.
    /// ## Returns
    /// The reflection data of the compiled program, including its handle.
    /// ## Errors
    /// * `ResourceError::Shader` - If the source cannot be loaded or is invalid.
    fn create_shader_program(
        &self,
        descriptor: &ShaderProgramDescriptor,
    ) -> Result<ShaderReflection, ResourceError>;

    /// Creates an input layout binding `elements` to the vertex stage of `pass`.
    /// ## Errors
    /// * `ResourceError::InputLayout` - If the elements do not match the pass signature.
    fn create_input_layout(
        &self,
        elements: &[InputElementDescription],
        pass: PassId,
    ) -> Result<InputLayoutId, ResourceError>;

    /// Writes a matrix parameter.
    fn set_matrix(&self, handle: ParameterHandle, value: &Mat4) -> Result<(), ResourceError>;

    /// Writes a bool parameter.
    fn set_bool(&self, handle: ParameterHandle, value: bool) -> Result<(), ResourceError>;

    /// Writes a float parameter.
    fn set_float(&self, handle: ParameterHandle, value: f32) -> Result<(), ResourceError>;

    /// Writes a float4 parameter.
    fn set_float4(&self, handle: ParameterHandle, value: &Vec4) -> Result<(), ResourceError>;

    /// Binds a texture to a texture parameter. `None` binds the null resource.
    fn set_texture(
        &self,
        handle: ParameterHandle,
        texture: Option<TextureId>,
    ) -> Result<(), ResourceError>;

    /// Sets how subsequent draws assemble primitives.
    fn set_primitive_topology(&self, topology: PrimitiveTopology);

    /// Binds an input layout for subsequent draws.
    fn set_input_layout(&self, layout: InputLayoutId) -> Result<(), ResourceError>;

    /// Binds vertex streams to consecutive slots starting at `start_slot`.
    fn set_vertex_buffers(
        &self,
        start_slot: u32,
        bindings: &[VertexBufferBinding],
    ) -> Result<(), ResourceError>;

    /// Binds the index buffer for subsequent indexed draws.
    fn set_index_buffer(
        &self,
        buffer: BufferId,
        format: IndexFormat,
        offset: u32,
    ) -> Result<(), ResourceError>;

    /// Commits the pipeline state of `pass`, including every pending parameter write.
    fn apply_pass(&self, pass: PassId) -> Result<(), ResourceError>;

    /// Draws non-indexed primitives.
    fn draw(&self, vertex_count: u32, start_vertex: u32);

    /// Draws indexed primitives.
    fn draw_indexed(&self, index_count: u32, start_index: u32, base_vertex: i32);
}
