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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Every error here is a contract violation surfaced to the immediate caller;
//! nothing in the engine retries or swallows them.

use crate::renderer::api::{ContentType, ParameterKind, ShaderProgramId};
use crate::renderer::light::MAX_DIRECTIONAL_LIGHTS;
use std::fmt;

/// An error related to loading or compiling a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// The program source could not be read from a path.
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// The underlying I/O or parse error.
        source_error: String,
    },
    /// The program source was read but is not a valid program.
    CompilationError {
        /// A descriptive label for the program.
        label: String,
        /// What is wrong with it.
        details: String,
    },
    /// The requested program could not be found.
    NotFound {
        /// The ID of the program that was not found.
        id: ShaderProgramId,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path, source_error } => {
                write!(
                    f,
                    "Failed to load shader program from '{path}': {source_error}"
                )
            }
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader program compilation failed for '{label}': {details}")
            }
            ShaderError::NotFound { id } => {
                write!(f, "Shader program not found for ID: {id:?}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a device resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// An input layout does not match the pass it was created for.
    InputLayout(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
    /// An attempt was made to access a resource out of its bounds.
    OutOfBounds,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::InputLayout(msg) => write!(f, "Invalid input layout: {msg}"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// An error raised while constructing or writing a geometry buffer.
#[derive(Debug)]
pub enum GeometryError {
    /// The element type's size does not match the content type's stride.
    StrideMismatch {
        /// The requested content type.
        content: ContentType,
        /// The stride the content type requires.
        expected: u32,
        /// The size of the element type supplied.
        actual: usize,
    },
    /// Index content was flagged per-instance.
    PerInstanceIndex,
    /// A static buffer was written to after creation.
    NotDynamic,
    /// Procedural shape parameters are out of range.
    InvalidShape(String),
    /// The device failed to create or update the buffer.
    Resource(ResourceError),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::StrideMismatch {
                content,
                expected,
                actual,
            } => write!(
                f,
                "Illegal content type for this constructor: {content} expects {expected} byte elements, got {actual}"
            ),
            GeometryError::PerInstanceIndex => {
                write!(f, "An index buffer cannot be 'per instance'")
            }
            GeometryError::NotDynamic => {
                write!(f, "The buffer was not created as dynamic and cannot be written")
            }
            GeometryError::InvalidShape(msg) => write!(f, "Invalid shape parameters: {msg}"),
            GeometryError::Resource(err) => write!(f, "Geometry resource error: {err}"),
        }
    }
}

impl std::error::Error for GeometryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeometryError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for GeometryError {
    fn from(err: ResourceError) -> Self {
        GeometryError::Resource(err)
    }
}

/// A violation of the material/effect contract.
#[derive(Debug)]
pub enum MaterialError {
    /// A material was passed to an effect other than the one that created it.
    IncompatibleMaterial {
        /// The effect the material belongs to.
        material_effect: String,
        /// The effect it was passed to.
        effect: String,
    },
    /// The attribute is not a tweakable parameter of the effect.
    UnknownAttribute {
        /// The parameter type that was requested.
        kind: ParameterKind,
        /// The attribute name.
        name: String,
    },
    /// The attribute exists but was never explicitly set.
    UninitializedAttribute {
        /// The parameter type that was requested.
        kind: ParameterKind,
        /// The attribute name.
        name: String,
    },
    /// The effect lacks `world` or `worldInverseTranspose`.
    MissingReservedMatrix {
        /// The effect name.
        effect: String,
        /// The missing matrix.
        name: &'static str,
    },
    /// The effect has no technique with this name.
    UnknownTechnique {
        /// The effect name.
        effect: String,
        /// The requested technique.
        technique: String,
    },
    /// No effect is registered under this name.
    UnknownEffect {
        /// The requested effect.
        name: String,
    },
    /// The texture registry has no texture with this name.
    UnknownTexture {
        /// The requested texture.
        name: String,
    },
    /// The shared parameter pool lacks a variable the frame uniforms need.
    MissingSharedParameter {
        /// The variable name.
        name: String,
    },
    /// A directional light slot beyond the supported count was addressed.
    LightIndexOutOfRange {
        /// The requested slot.
        index: usize,
    },
    /// The device rejected a parameter write or program creation.
    Resource(ResourceError),
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::IncompatibleMaterial {
                material_effect,
                effect,
            } => write!(
                f,
                "Material is not compatible with the effect it is being passed to (material for '{material_effect}', effect '{effect}')"
            ),
            MaterialError::UnknownAttribute { kind, name } => {
                write!(f, "Could not find {kind} type material attribute: {name}")
            }
            MaterialError::UninitializedAttribute { kind, name } => write!(
                f,
                "The {kind} type material attribute: {name} has not yet been initialized"
            ),
            MaterialError::MissingReservedMatrix { effect, name } => write!(
                f,
                "Effect '{effect}' does not declare the reserved matrix '{name}'"
            ),
            MaterialError::UnknownTechnique { effect, technique } => write!(
                f,
                "Effect does not contain technique: {technique} (effect '{effect}')"
            ),
            MaterialError::UnknownEffect { name } => {
                write!(f, "No effect loaded by the name: {name}")
            }
            MaterialError::UnknownTexture { name } => {
                write!(f, "No texture registered by the name: {name}")
            }
            MaterialError::MissingSharedParameter { name } => {
                write!(f, "Could not retrieve shared effect variable: {name}")
            }
            MaterialError::LightIndexOutOfRange { index } => write!(
                f,
                "Directional light index {index} exceeds the {MAX_DIRECTIONAL_LIGHTS} available slots"
            ),
            MaterialError::Resource(err) => write!(f, "Effect resource error: {err}"),
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for MaterialError {
    fn from(err: ResourceError) -> Self {
        MaterialError::Resource(err)
    }
}

/// An error raised while validating geometry buffers against a technique.
#[derive(Debug)]
pub enum BindingError {
    /// More than one buffer tagged as index content.
    MultipleIndexBuffers,
    /// Only index data was supplied.
    NoVertexBuffer,
    /// A vertex buffer was flagged per-instance.
    PerInstanceVertexBuffer {
        /// Position of the buffer in the supplied list.
        index: usize,
    },
    /// Vertex buffers disagree on their element count.
    ElementCountMismatch {
        /// Element count of the first vertex buffer.
        expected: u32,
        /// Element count of the offending buffer.
        found: u32,
        /// Position of the offending buffer in the supplied list.
        index: usize,
    },
    /// No remaining buffer provides a semantic the pass requires.
    UnsatisfiedSemantic {
        /// The pass being validated.
        pass: String,
        /// The semantic name.
        semantic: String,
        /// The semantic index.
        index: u32,
    },
    /// A repeated semantic was requested before its predecessor.
    SemanticOutOfOrder {
        /// The pass being validated.
        pass: String,
        /// The semantic name.
        semantic: String,
        /// The semantic index requested too early.
        index: u32,
    },
    /// The content type has no vertex semantic.
    NoSemantic {
        /// The content type.
        content: ContentType,
    },
    /// Resolving the effect or technique failed.
    Material(MaterialError),
    /// Creating a geometry buffer failed.
    Geometry(GeometryError),
    /// Creating the input layout failed.
    Resource(ResourceError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::MultipleIndexBuffers => {
                write!(f, "Only one index buffer is permitted")
            }
            BindingError::NoVertexBuffer => write!(f, "No vertex buffer was provided"),
            BindingError::PerInstanceVertexBuffer { index } => write!(
                f,
                "Currently, per instance data is not supported (vertex buffer {index})"
            ),
            BindingError::ElementCountMismatch {
                expected,
                found,
                index,
            } => write!(
                f,
                "Not all vertex buffers contain the same number of elements (buffer {index} has {found}, expected {expected})"
            ),
            BindingError::UnsatisfiedSemantic {
                pass,
                semantic,
                index,
            } => write!(
                f,
                "Pass '{pass}' requires {semantic}{index} but no provided buffer satisfies semantic {semantic}"
            ),
            BindingError::SemanticOutOfOrder {
                pass,
                semantic,
                index,
            } => write!(
                f,
                "Pass '{pass}' requests {semantic}{index} before {semantic}{}",
                index.saturating_sub(1)
            ),
            BindingError::NoSemantic { content } => {
                write!(f, "Content type {content} cannot be bound as a vertex input")
            }
            BindingError::Material(err) => write!(f, "Technique lookup failed: {err}"),
            BindingError::Geometry(err) => write!(f, "Geometry creation failed: {err}"),
            BindingError::Resource(err) => write!(f, "Input binding resource error: {err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindingError::Material(err) => Some(err),
            BindingError::Geometry(err) => Some(err),
            BindingError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MaterialError> for BindingError {
    fn from(err: MaterialError) -> Self {
        BindingError::Material(err)
    }
}

impl From<GeometryError> for BindingError {
    fn from(err: GeometryError) -> Self {
        BindingError::Geometry(err)
    }
}

impl From<ResourceError> for BindingError {
    fn from(err: ResourceError) -> Self {
        BindingError::Resource(err)
    }
}

/// An error raised while dispatching renderables.
#[derive(Debug)]
pub enum RenderError {
    /// The object's buffers have not been validated against a technique.
    NotValidated,
    /// The object has no material.
    NoMaterial,
    /// A raw render-type index is outside the known range.
    InvalidRenderType(usize),
    /// Binding the material or world matrix failed.
    Material(MaterialError),
    /// A device operation failed.
    Resource(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotValidated => write!(
                f,
                "The vertex buffers have not been validated against a technique. \
                 Make sure both the buffers and the technique have been set and \
                 that the buffers provide all the data required by the technique."
            ),
            RenderError::NoMaterial => write!(f, "No material has been set for this object"),
            RenderError::InvalidRenderType(index) => {
                write!(f, "Invalid render type index: {index}")
            }
            RenderError::Material(err) => write!(f, "Material binding failed: {err}"),
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Material(err) => Some(err),
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MaterialError> for RenderError {
    fn from(err: MaterialError) -> Self {
        RenderError::Material(err)
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn material_error_display() {
        let err = MaterialError::UnknownAttribute {
            kind: ParameterKind::Float4,
            name: "diffuseColor".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Could not find float4 type material attribute: diffuseColor"
        );

        let err = MaterialError::UnknownEffect {
            name: "missing".to_string(),
        };
        assert_eq!(format!("{err}"), "No effect loaded by the name: missing");
    }

    #[test]
    fn binding_error_display() {
        assert_eq!(
            format!("{}", BindingError::MultipleIndexBuffers),
            "Only one index buffer is permitted"
        );
        let err = BindingError::SemanticOutOfOrder {
            pass: "P0".to_string(),
            semantic: "TEXCOORD".to_string(),
            index: 2,
        };
        assert_eq!(format!("{err}"), "Pass 'P0' requests TEXCOORD2 before TEXCOORD1");
    }

    #[test]
    fn render_error_wraps_material_and_resource_errors() {
        let shader_err = ShaderError::NotFound {
            id: ShaderProgramId(3),
        };
        let material_err: MaterialError = ResourceError::from(shader_err).into();
        let render_err: RenderError = material_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Material binding failed: Effect resource error: Shader resource error: Shader program not found for ID: ShaderProgramId(3)"
        );
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }

    #[test]
    fn geometry_error_display() {
        let err = GeometryError::StrideMismatch {
            content: ContentType::Position,
            expected: 12,
            actual: 8,
        };
        assert_eq!(
            format!("{err}"),
            "Illegal content type for this constructor: Position expects 12 byte elements, got 8"
        );
    }
}
