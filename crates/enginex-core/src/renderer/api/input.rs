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

//! Input-assembler element descriptions and pass signatures.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::content::{ContentType, ElementFormat};
use crate::renderer::error::BindingError;

/// Whether an input element advances per vertex or per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum InputClassification {
    /// The element advances once per vertex.
    #[default]
    PerVertex,
    /// The element advances once every `instance_step_rate` instances.
    PerInstance,
}

/// Describes one element the input assembler feeds to the vertex stage.
///
/// Ordered lists of descriptions are used as cache keys, hence the full set of
/// comparison derives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputElementDescription {
    /// Shader semantic, e.g. `"POSITION"`.
    pub semantic_name: Cow<'static, str>,
    /// Distinguishes repeated semantics (`TEXCOORD0`, `TEXCOORD1`, ...).
    pub semantic_index: u32,
    /// Element format.
    pub format: ElementFormat,
    /// Vertex-buffer slot the element is read from.
    pub input_slot: u32,
    /// Byte offset of the element inside one buffer element.
    pub aligned_byte_offset: u32,
    /// Per-vertex or per-instance stepping.
    pub classification: InputClassification,
    /// Number of instances to draw before advancing, `0` for per-vertex data.
    pub instance_step_rate: u32,
}

impl InputElementDescription {
    /// Expands a content type into the input elements that read it.
    ///
    /// A content type wider than its format (a 64 byte transform stored as
    /// four `float4`) yields one description per chunk, with consecutive
    /// semantic indices starting at `start_semantic_index` and byte offsets
    /// advancing by the format size. All returned elements share `input_slot`.
    ///
    /// # Errors
    /// [`BindingError::NoSemantic`] if the content type cannot be bound as a
    /// vertex input (index data).
    pub fn for_content(
        content: ContentType,
        start_semantic_index: u32,
        input_slot: u32,
        per_instance: bool,
        instance_step_rate: u32,
    ) -> Result<Vec<Self>, BindingError> {
        let semantic = content
            .semantic()
            .ok_or(BindingError::NoSemantic { content })?;
        let format = content.format();
        let (classification, step_rate) = if per_instance {
            (InputClassification::PerInstance, instance_step_rate)
        } else {
            (InputClassification::PerVertex, 0)
        };

        Ok((0..content.input_element_count())
            .map(|i| InputElementDescription {
                semantic_name: Cow::Borrowed(semantic),
                semantic_index: start_semantic_index + i,
                format,
                input_slot,
                aligned_byte_offset: i * format.size(),
                classification,
                instance_step_rate: step_rate,
            })
            .collect())
    }
}

/// One entry of the vertex-input signature a pass expects, e.g. `TEXCOORD1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatureParameter {
    /// The semantic name.
    pub semantic_name: String,
    /// The semantic index.
    #[serde(default)]
    pub semantic_index: u32,
}

impl SignatureParameter {
    /// Creates a signature entry.
    pub fn new(semantic_name: impl Into<String>, semantic_index: u32) -> Self {
        Self {
            semantic_name: semantic_name.into(),
            semantic_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_expands_with_consecutive_indices_and_offsets() {
        let elements =
            InputElementDescription::for_content(ContentType::Transform, 2, 3, true, 1).unwrap();
        assert_eq!(elements.len(), 4);
        for (i, element) in elements.iter().enumerate() {
            assert_eq!(element.semantic_name, "TRANSFORM");
            assert_eq!(element.semantic_index, 2 + i as u32);
            assert_eq!(element.aligned_byte_offset, 16 * i as u32);
            assert_eq!(element.input_slot, 3);
            assert_eq!(element.classification, InputClassification::PerInstance);
            assert_eq!(element.instance_step_rate, 1);
        }
    }

    #[test]
    fn test_position_expands_into_single_element() {
        let elements =
            InputElementDescription::for_content(ContentType::Position, 0, 0, false, 7).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].format, ElementFormat::Float32x3);
        assert_eq!(elements[0].instance_step_rate, 0);
    }

    #[test]
    fn test_index_content_cannot_become_input() {
        let result = InputElementDescription::for_content(ContentType::Index, 0, 0, false, 0);
        assert!(matches!(result, Err(BindingError::NoSemantic { .. })));
    }
}
