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

//! Typed geometry buffers.

use bytemuck::Pod;
use enginex_core::math::{LinearRgba, Mat4, Vec2, Vec3};
use enginex_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, ContentType, GeometryError, GraphicsDevice,
};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Creation flags of a [`GeometryBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferOptions {
    /// The CPU may rewrite the contents after creation.
    pub dynamic: bool,
    /// The data advances per instance rather than per vertex.
    pub per_instance: bool,
}

impl BufferOptions {
    /// Static per-vertex data.
    pub const STATIC: Self = Self {
        dynamic: false,
        per_instance: false,
    };

    /// CPU-writable per-vertex data.
    pub const DYNAMIC: Self = Self {
        dynamic: true,
        per_instance: false,
    };
}

/// A device buffer tagged with what it holds.
///
/// Geometry buffers are shared between polygon sets through `Arc`; the device
/// buffer is destroyed when the last owner drops it.
pub struct GeometryBuffer {
    id: BufferId,
    content: ContentType,
    element_count: u32,
    options: BufferOptions,
    device: Arc<dyn GraphicsDevice>,
}

impl fmt::Debug for GeometryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryBuffer")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("element_count", &self.element_count)
            .field("options", &self.options)
            .finish()
    }
}

impl GeometryBuffer {
    /// Uploads `data` as a buffer of `content`.
    ///
    /// # Errors
    /// * [`GeometryError::StrideMismatch`] if `T` is not exactly one element of `content`.
    /// * [`GeometryError::PerInstanceIndex`] for index data flagged per instance.
    /// * [`GeometryError::Resource`] if the device fails to create the buffer.
    pub fn new<T: Pod>(
        device: Arc<dyn GraphicsDevice>,
        content: ContentType,
        data: &[T],
        options: BufferOptions,
    ) -> Result<Self, GeometryError> {
        let stride = content.stride();
        let element_size = std::mem::size_of::<T>();
        if element_size != stride as usize {
            return Err(GeometryError::StrideMismatch {
                content,
                expected: stride,
                actual: element_size,
            });
        }
        if content == ContentType::Index && options.per_instance {
            return Err(GeometryError::PerInstanceIndex);
        }

        let mut usage = if content == ContentType::Index {
            BufferUsage::INDEX
        } else {
            BufferUsage::VERTEX
        };
        if options.dynamic {
            usage = usage | BufferUsage::CPU_WRITE;
        }

        let element_count = data.len() as u32;
        let descriptor = BufferDescriptor {
            label: Some(Cow::Owned(format!("{content} buffer"))),
            usage,
            stride,
            element_count,
        };
        let id = device.create_buffer_with_data(&descriptor, bytemuck::cast_slice(data))?;

        Ok(Self {
            id,
            content,
            element_count,
            options,
            device,
        })
    }

    /// A static buffer of object-space positions.
    pub fn from_positions(
        device: Arc<dyn GraphicsDevice>,
        positions: &[Vec3],
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::Position, positions, BufferOptions::STATIC)
    }

    /// A static buffer of normals.
    pub fn from_normals(
        device: Arc<dyn GraphicsDevice>,
        normals: &[Vec3],
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::Normal, normals, BufferOptions::STATIC)
    }

    /// A static buffer of two-dimensional texture coordinates.
    pub fn from_tex_coords(
        device: Arc<dyn GraphicsDevice>,
        tex_coords: &[Vec2],
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::TexCoord2D, tex_coords, BufferOptions::STATIC)
    }

    /// A static buffer of vertex colors.
    pub fn from_colors(
        device: Arc<dyn GraphicsDevice>,
        colors: &[LinearRgba],
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::Color, colors, BufferOptions::STATIC)
    }

    /// A static buffer of 32-bit triangle indices.
    pub fn from_indices(
        device: Arc<dyn GraphicsDevice>,
        indices: &[u32],
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::Index, indices, BufferOptions::STATIC)
    }

    /// A buffer of per-element matrices.
    pub fn from_transforms(
        device: Arc<dyn GraphicsDevice>,
        transforms: &[Mat4],
        options: BufferOptions,
    ) -> Result<Self, GeometryError> {
        Self::new(device, ContentType::Transform, transforms, options)
    }

    /// The device handle.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// What the buffer holds.
    pub fn content_type(&self) -> ContentType {
        self.content
    }

    /// Number of elements.
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    /// Size of one element in bytes.
    pub fn stride(&self) -> u32 {
        self.content.stride()
    }

    /// Returns `true` if the CPU may rewrite the contents.
    pub fn is_dynamic(&self) -> bool {
        self.options.dynamic
    }

    /// Returns `true` if the data advances per instance.
    pub fn is_per_instance(&self) -> bool {
        self.options.per_instance
    }

    /// Overwrites elements starting at `first_element`.
    ///
    /// # Errors
    /// [`GeometryError::NotDynamic`] for static buffers, and
    /// [`GeometryError::StrideMismatch`] if `T` does not match the content.
    pub fn write<T: Pod>(&self, first_element: u32, data: &[T]) -> Result<(), GeometryError> {
        if !self.options.dynamic {
            return Err(GeometryError::NotDynamic);
        }
        let element_size = std::mem::size_of::<T>();
        if element_size != self.stride() as usize {
            return Err(GeometryError::StrideMismatch {
                content: self.content,
                expected: self.stride(),
                actual: element_size,
            });
        }
        let offset = u64::from(first_element) * u64::from(self.stride());
        self.device
            .write_buffer(self.id, offset, bytemuck::cast_slice(data))?;
        Ok(())
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        if let Err(e) = self.device.destroy_buffer(self.id) {
            log::warn!("Failed to destroy {} buffer {:?}: {}", self.content, self.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginex_infra::graphics::headless::HeadlessDevice;

    #[test]
    fn test_stride_mismatch_is_rejected() {
        let device = Arc::new(HeadlessDevice::new());
        let err = GeometryBuffer::new(
            device,
            ContentType::Position,
            &[Vec2::ZERO; 3],
            BufferOptions::STATIC,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Illegal content type for this constructor: Position expects 12 byte elements, got 8"
        );
    }

    #[test]
    fn test_per_instance_index_buffer_is_rejected() {
        let device = Arc::new(HeadlessDevice::new());
        let options = BufferOptions {
            dynamic: false,
            per_instance: true,
        };
        let err = GeometryBuffer::new(device, ContentType::Index, &[0u32, 1, 2], options)
            .unwrap_err();
        assert!(matches!(err, GeometryError::PerInstanceIndex));
    }

    #[test]
    fn test_write_requires_dynamic_buffer() {
        let device = Arc::new(HeadlessDevice::new());
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];

        let fixed = GeometryBuffer::from_positions(device.clone(), &positions).unwrap();
        assert!(matches!(
            fixed.write(0, &positions),
            Err(GeometryError::NotDynamic)
        ));

        let dynamic = GeometryBuffer::new(
            device.clone(),
            ContentType::Position,
            &positions,
            BufferOptions::DYNAMIC,
        )
        .unwrap();
        dynamic.write(1, &[Vec3::Z]).unwrap();
        assert_eq!(dynamic.element_count(), 3);
    }

    #[test]
    fn test_drop_destroys_device_buffer() {
        let device = Arc::new(HeadlessDevice::new());
        let buffer = GeometryBuffer::from_indices(device.clone(), &[0, 1, 2]).unwrap();
        assert_eq!(device.live_buffer_count(), 1);
        drop(buffer);
        assert_eq!(device.live_buffer_count(), 0);
    }
}
