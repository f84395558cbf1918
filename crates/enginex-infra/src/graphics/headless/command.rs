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

//! Commands and counters recorded by the headless device.

use enginex_core::math::{Mat4, Vec4};
use enginex_core::renderer::{
    BufferId, BufferUsage, IndexFormat, InputLayoutId, ParameterHandle, ParameterKind,
    ParameterValue, PassId, PrimitiveTopology, ShaderProgramId, TextureId, VertexBufferBinding,
};

/// A value held by a program parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// A 4x4 matrix.
    Matrix(Mat4),
    /// A boolean.
    Bool(bool),
    /// A scalar.
    Float(f32),
    /// A four-component vector.
    Float4(Vec4),
    /// A texture, or the null texture.
    Texture(Option<TextureId>),
}

impl BoundValue {
    /// The parameter type of the value.
    pub fn kind(&self) -> ParameterKind {
        match self {
            BoundValue::Matrix(_) => ParameterKind::Matrix,
            BoundValue::Bool(_) => ParameterKind::Bool,
            BoundValue::Float(_) => ParameterKind::Float,
            BoundValue::Float4(_) => ParameterKind::Float4,
            BoundValue::Texture(_) => ParameterKind::Texture,
        }
    }

    /// The value a freshly compiled program holds for `default`.
    ///
    /// Textures start unbound whatever their declared default name is.
    pub(crate) fn initial(default: &ParameterValue) -> Self {
        match default {
            ParameterValue::Matrix(m) => BoundValue::Matrix(*m),
            ParameterValue::Bool(b) => BoundValue::Bool(*b),
            ParameterValue::Float(f) => BoundValue::Float(*f),
            ParameterValue::Float4(v) => BoundValue::Float4(*v),
            ParameterValue::Texture(_) => BoundValue::Texture(None),
        }
    }
}

/// One call made on the device, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// A buffer was created.
    CreateBuffer {
        /// The new buffer.
        id: BufferId,
        /// Its usage flags.
        usage: BufferUsage,
        /// Its size in bytes.
        size: u64,
    },
    /// A dynamic buffer was rewritten.
    WriteBuffer {
        /// The buffer.
        id: BufferId,
        /// Byte offset of the write.
        offset: u64,
        /// Number of bytes written.
        size: u64,
    },
    /// A buffer was destroyed.
    DestroyBuffer(BufferId),
    /// A shader program was compiled.
    CreateProgram(ShaderProgramId),
    /// An input layout was created.
    CreateInputLayout {
        /// The new layout.
        id: InputLayoutId,
        /// The pass it was validated against.
        pass: PassId,
    },
    /// A program parameter was written.
    SetParameter {
        /// The parameter.
        handle: ParameterHandle,
        /// The value written.
        value: BoundValue,
    },
    /// The primitive topology was set.
    SetPrimitiveTopology(PrimitiveTopology),
    /// An input layout was bound.
    SetInputLayout(InputLayoutId),
    /// Vertex streams were bound.
    SetVertexBuffers {
        /// The first slot bound.
        start_slot: u32,
        /// One binding per consecutive slot.
        bindings: Vec<VertexBufferBinding>,
    },
    /// An index buffer was bound.
    SetIndexBuffer {
        /// The buffer.
        buffer: BufferId,
        /// The index format.
        format: IndexFormat,
        /// Byte offset of the first index.
        offset: u32,
    },
    /// A pass was applied.
    ApplyPass(PassId),
    /// A non-indexed draw.
    Draw {
        /// Number of vertices.
        vertex_count: u32,
        /// First vertex.
        start_vertex: u32,
    },
    /// An indexed draw.
    DrawIndexed {
        /// Number of indices.
        index_count: u32,
        /// First index.
        start_index: u32,
        /// Value added to every index.
        base_vertex: i32,
    },
}

impl RecordedCommand {
    /// Returns `true` for `Draw` and `DrawIndexed`.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            RecordedCommand::Draw { .. } | RecordedCommand::DrawIndexed { .. }
        )
    }
}

/// Counters accumulated since creation or the last [`reset_stats`](super::HeadlessDevice::reset_stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Buffers created.
    pub buffers_created: u64,
    /// Buffers destroyed.
    pub buffers_destroyed: u64,
    /// Bytes uploaded at creation or through writes.
    pub bytes_uploaded: u64,
    /// Shader programs compiled.
    pub programs_created: u64,
    /// Input layouts created.
    pub input_layouts_created: u64,
    /// Parameter writes of any type.
    pub parameter_writes: u64,
    /// Passes applied.
    pub passes_applied: u64,
    /// Non-indexed draws.
    pub draws: u64,
    /// Indexed draws.
    pub indexed_draws: u64,
}
