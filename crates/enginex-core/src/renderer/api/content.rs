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

//! Vertex content types and the element formats they map to.
//!
//! Every [`ContentType`] resolves to exactly one `(format, stride, semantic)`
//! triple. The stride is the size of one element as stored in a geometry
//! buffer; the format is the size of one shader input element. A content type
//! whose stride exceeds its format (only [`ContentType::Transform`]) is fed to
//! the shader as several consecutive input elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The numeric format of one shader input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementFormat {
    /// One 32-bit float.
    Float32,
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
    /// One 32-bit unsigned integer.
    Uint32,
}

impl ElementFormat {
    /// Size of one element of this format in bytes.
    pub const fn size(self) -> u32 {
        match self {
            ElementFormat::Float32 | ElementFormat::Uint32 => 4,
            ElementFormat::Float32x2 => 8,
            ElementFormat::Float32x3 => 12,
            ElementFormat::Float32x4 => 16,
        }
    }
}

/// Tags what a geometry buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    /// Per-vertex bitangent.
    BiTangent,
    /// Skinning bone indices.
    BlendIndex,
    /// Skinning bone weight.
    BlendWeight,
    /// RGBA vertex color.
    Color,
    /// Per-vertex normal.
    Normal,
    /// Object-space position.
    Position,
    /// Pre-transformed (screen-space) position.
    PositionT,
    /// Point sprite size.
    PointSize,
    /// Per-vertex tangent.
    Tangent,
    /// One-dimensional texture coordinate.
    TexCoord1D,
    /// Two-dimensional texture coordinate.
    TexCoord2D,
    /// Three-dimensional texture coordinate.
    TexCoord3D,
    /// Triangle indices. Never bound as a vertex stream.
    Index,
    /// A 4x4 matrix per element, fed to the shader as four `float4` inputs.
    Transform,
}

impl ContentType {
    /// Every content type, in declaration order.
    pub const ALL: [ContentType; 14] = [
        ContentType::BiTangent,
        ContentType::BlendIndex,
        ContentType::BlendWeight,
        ContentType::Color,
        ContentType::Normal,
        ContentType::Position,
        ContentType::PositionT,
        ContentType::PointSize,
        ContentType::Tangent,
        ContentType::TexCoord1D,
        ContentType::TexCoord2D,
        ContentType::TexCoord3D,
        ContentType::Index,
        ContentType::Transform,
    ];

    /// The shader semantic this content satisfies. `None` for index data.
    pub const fn semantic(self) -> Option<&'static str> {
        Some(match self {
            ContentType::BiTangent => "BITANGENT",
            ContentType::BlendIndex => "BLENDINDICES",
            ContentType::BlendWeight => "BLENDWEIGHT",
            ContentType::Color => "COLOR",
            ContentType::Normal => "NORMAL",
            ContentType::Position => "POSITION",
            ContentType::PositionT => "POSITIONT",
            ContentType::PointSize => "PSIZE",
            ContentType::Tangent => "TANGENT",
            ContentType::TexCoord1D | ContentType::TexCoord2D | ContentType::TexCoord3D => {
                "TEXCOORD"
            }
            ContentType::Transform => "TRANSFORM",
            ContentType::Index => return None,
        })
    }

    /// The format of a single shader input element for this content.
    pub const fn format(self) -> ElementFormat {
        match self {
            ContentType::BiTangent
            | ContentType::Normal
            | ContentType::Position
            | ContentType::Tangent
            | ContentType::TexCoord3D => ElementFormat::Float32x3,
            ContentType::Color | ContentType::PositionT | ContentType::Transform => {
                ElementFormat::Float32x4
            }
            ContentType::BlendWeight | ContentType::PointSize | ContentType::TexCoord1D => {
                ElementFormat::Float32
            }
            ContentType::TexCoord2D => ElementFormat::Float32x2,
            ContentType::BlendIndex | ContentType::Index => ElementFormat::Uint32,
        }
    }

    /// Size in bytes of one buffer element of this content.
    pub const fn stride(self) -> u32 {
        match self {
            ContentType::Transform => 64,
            other => other.format().size(),
        }
    }

    /// How many shader input elements one buffer element expands to.
    pub const fn input_element_count(self) -> u32 {
        self.stride() / self.format().size()
    }

    /// Returns `true` if a shader input with `semantic_name` can read this content.
    pub fn satisfies(self, semantic_name: &str) -> bool {
        self.semantic()
            .is_some_and(|semantic| semantic.eq_ignore_ascii_case(semantic_name))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_whole_number_of_elements() {
        for content in ContentType::ALL {
            assert_eq!(
                content.stride() % content.format().size(),
                0,
                "{content} stride must be a multiple of its format size"
            );
        }
    }

    #[test]
    fn test_transform_expands_into_four_elements() {
        assert_eq!(ContentType::Transform.stride(), 64);
        assert_eq!(ContentType::Transform.format(), ElementFormat::Float32x4);
        assert_eq!(ContentType::Transform.input_element_count(), 4);
        assert_eq!(ContentType::Position.input_element_count(), 1);
    }

    #[test]
    fn test_texcoords_share_semantic() {
        assert!(ContentType::TexCoord1D.satisfies("TEXCOORD"));
        assert!(ContentType::TexCoord2D.satisfies("texcoord"));
        assert!(ContentType::TexCoord3D.satisfies("TEXCOORD"));
        assert!(!ContentType::Position.satisfies("TEXCOORD"));
    }

    #[test]
    fn test_index_has_no_semantic() {
        assert_eq!(ContentType::Index.semantic(), None);
        assert!(!ContentType::Index.satisfies("INDEX"));
        assert_eq!(ContentType::Index.stride(), 4);
    }
}
