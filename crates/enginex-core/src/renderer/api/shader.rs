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

//! Shader programs, their tweakable parameters, and the declarative effect
//! definitions a device compiles them from.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use super::input::SignatureParameter;
use super::pipeline::PassId;
use crate::math::{Mat4, Vec4};

/// An opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderProgramId(pub usize);

/// An opaque handle to one global variable of a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterHandle(pub usize);

/// An opaque handle to a texture resource that can be bound to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// The type of a tweakable shader parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterKind {
    /// A 4x4 float matrix.
    Matrix,
    /// A boolean.
    Bool,
    /// A single float.
    Float,
    /// A four-component float vector.
    Float4,
    /// A texture reference.
    Texture,
}

impl ParameterKind {
    /// The value a parameter of this kind holds when its declaration has no default.
    pub fn zero_value(self) -> ParameterValue {
        match self {
            ParameterKind::Matrix => ParameterValue::Matrix(Mat4::IDENTITY),
            ParameterKind::Bool => ParameterValue::Bool(false),
            ParameterKind::Float => ParameterValue::Float(0.0),
            ParameterKind::Float4 => ParameterValue::Float4(Vec4::ZERO),
            ParameterKind::Texture => ParameterValue::Texture(None),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Matrix => "matrix",
            ParameterKind::Bool => "bool",
            ParameterKind::Float => "float",
            ParameterKind::Float4 => "float4",
            ParameterKind::Texture => "texture",
        };
        f.write_str(name)
    }
}

/// A typed parameter value. Textures are referenced by registry name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// A 4x4 float matrix.
    Matrix(Mat4),
    /// A boolean.
    Bool(bool),
    /// A single float.
    Float(f32),
    /// A four-component float vector.
    Float4(Vec4),
    /// A texture name, or `None` for "no texture".
    Texture(Option<String>),
}

impl ParameterValue {
    /// The kind of this value.
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Matrix(_) => ParameterKind::Matrix,
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Float4(_) => ParameterKind::Float4,
            ParameterValue::Texture(_) => ParameterKind::Texture,
        }
    }
}

/// Declares one global tweakable variable of an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// The variable name, e.g. `"diffuseColor"` or `"directionalLights[0].color"`.
    pub name: String,
    /// The variable type.
    pub kind: ParameterKind,
    /// The value reported as the shader default. Falls back to the kind's zero value.
    #[serde(default)]
    pub default: Option<ParameterValue>,
}

impl ParameterDefinition {
    /// Declares a parameter with the kind's zero value as default.
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Declares a parameter with an explicit default.
    pub fn with_default(name: impl Into<String>, default: ParameterValue) -> Self {
        Self {
            name: name.into(),
            kind: default.kind(),
            default: Some(default),
        }
    }

    /// The effective default value.
    pub fn default_value(&self) -> ParameterValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.zero_value())
    }
}

/// Declares one pass and the vertex-input signature its vertex stage expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassDefinition {
    /// The pass name.
    pub name: String,
    /// The ordered input signature.
    pub inputs: Vec<SignatureParameter>,
}

/// Declares a technique as an ordered list of passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueDefinition {
    /// The technique name.
    pub name: String,
    /// The passes, in execution order.
    pub passes: Vec<PassDefinition>,
}

/// A declarative effect: its tweakable globals and its techniques.
///
/// This is the asset format effects are compiled from. Effect files are RON
/// serializations of this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Global tweakable variables.
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Techniques exposed by the effect.
    #[serde(default)]
    pub techniques: Vec<TechniqueDefinition>,
}

/// Where a shader program is compiled from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderProgramSource {
    /// An in-memory definition.
    Definition(EffectDefinition),
    /// A file the device resolves and loads itself.
    File(PathBuf),
}

/// Describes a shader program to be created.
#[derive(Debug, Clone)]
pub struct ShaderProgramDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The program source.
    pub source: ShaderProgramSource,
}

/// A global variable as reported by a compiled program.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedParameter {
    /// The variable name.
    pub name: String,
    /// The handle used to write the variable.
    pub handle: ParameterHandle,
    /// The default value reported by the program.
    pub default: ParameterValue,
}

/// A pass as reported by a compiled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedPass {
    /// The pass handle used by `apply_pass` and input-layout creation.
    pub id: PassId,
    /// The pass name.
    pub name: String,
    /// The ordered vertex-input signature.
    pub input_signature: Vec<SignatureParameter>,
}

/// A technique as reported by a compiled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedTechnique {
    /// The technique name.
    pub name: String,
    /// The passes, in execution order.
    pub passes: Vec<ReflectedPass>,
}

/// Everything the engine needs to know about a compiled program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderReflection {
    /// The program handle.
    pub program: ShaderProgramId,
    /// Every global tweakable variable, in declaration order.
    pub parameters: Vec<ReflectedParameter>,
    /// Every technique, in declaration order.
    pub techniques: Vec<ReflectedTechnique>,
}

impl ShaderReflection {
    /// Looks up a variable by name.
    pub fn parameter(&self, name: &str) -> Option<&ReflectedParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_definition_from_ron() {
        let source = r#"(
            parameters: [
                (name: "diffuseColor", kind: Float4, default: Some(Float4((x: 1.0, y: 1.0, z: 1.0, w: 1.0)))),
                (name: "diffuseTexture", kind: Texture),
            ],
            techniques: [
                (name: "RenderDefault", passes: [
                    (name: "P0", inputs: [(semantic_name: "POSITION"), (semantic_name: "TEXCOORD", semantic_index: 0)]),
                ]),
            ],
        )"#;
        let definition: EffectDefinition = ron::from_str(source).unwrap();
        assert_eq!(definition.parameters.len(), 2);
        assert_eq!(
            definition.parameters[0].default_value(),
            ParameterValue::Float4(Vec4::ONE)
        );
        assert_eq!(
            definition.parameters[1].default_value(),
            ParameterValue::Texture(None)
        );
        assert_eq!(definition.techniques[0].passes[0].inputs[1].semantic_index, 0);
    }

    #[test]
    fn test_kind_display_is_lowercase() {
        assert_eq!(ParameterKind::Float4.to_string(), "float4");
        assert_eq!(ParameterKind::Matrix.to_string(), "matrix");
    }
}
