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

//! Integration tests for the headless device: program compilation, input
//! layout validation and command recording.

use enginex_core::math::Vec4;
use enginex_core::renderer::{
    BufferDescriptor, BufferUsage, ContentType, EffectDefinition, GraphicsDevice,
    InputElementDescription, ParameterDefinition, ParameterKind, ParameterValue, PassDefinition,
    ResourceError, ShaderError, ShaderProgramDescriptor, ShaderProgramSource,
    SignatureParameter, TechniqueDefinition,
};
use enginex_infra::graphics::headless::{BoundValue, HeadlessDevice, RecordedCommand};

fn descriptor(definition: EffectDefinition) -> ShaderProgramDescriptor<'static> {
    ShaderProgramDescriptor {
        label: Some("test".into()),
        source: ShaderProgramSource::Definition(definition),
    }
}

fn textured_definition() -> EffectDefinition {
    EffectDefinition {
        parameters: vec![
            ParameterDefinition::with_default("tint", ParameterValue::Float4(Vec4::ONE)),
            ParameterDefinition::with_default(
                "diffuseTexture",
                ParameterValue::Texture(Some("stars".to_string())),
            ),
        ],
        techniques: vec![TechniqueDefinition {
            name: "Textured".to_string(),
            passes: vec![PassDefinition {
                name: "P0".to_string(),
                inputs: vec![
                    SignatureParameter::new("POSITION", 0),
                    SignatureParameter::new("TEXCOORD", 0),
                ],
            }],
        }],
    }
}

#[test]
fn test_compiled_program_holds_defaults() {
    let device = HeadlessDevice::new();
    let reflection = device
        .create_shader_program(&descriptor(textured_definition()))
        .unwrap();

    let tint = reflection.parameter("tint").unwrap();
    assert_eq!(
        device.parameter_value(tint.handle),
        Some(BoundValue::Float4(Vec4::ONE))
    );
    // Textures start unbound whatever their declared default is.
    let texture = reflection.parameter("diffuseTexture").unwrap();
    assert_eq!(
        device.parameter_value(texture.handle),
        Some(BoundValue::Texture(None))
    );
    assert_eq!(device.stats().programs_created, 1);
}

#[test]
fn test_duplicate_parameter_fails_to_compile() {
    let device = HeadlessDevice::new();
    let definition = EffectDefinition {
        parameters: vec![
            ParameterDefinition::new("tint", ParameterKind::Float4),
            ParameterDefinition::new("tint", ParameterKind::Float),
        ],
        techniques: Vec::new(),
    };
    let err = device
        .create_shader_program(&descriptor(definition))
        .unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Shader(ShaderError::CompilationError { .. })
    ));
}

#[test]
fn test_parameter_kind_is_enforced() {
    let device = HeadlessDevice::new();
    let reflection = device
        .create_shader_program(&descriptor(textured_definition()))
        .unwrap();
    let tint = reflection.parameter("tint").unwrap().handle;

    assert!(device.set_float(tint, 1.0).is_err());
    device.set_float4(tint, &Vec4::ZERO).unwrap();
    assert_eq!(device.writes_to(tint), 1);
    assert_eq!(device.stats().parameter_writes, 1);
}

#[test]
fn test_input_layout_must_match_pass_signature() {
    let device = HeadlessDevice::new();
    let reflection = device
        .create_shader_program(&descriptor(textured_definition()))
        .unwrap();
    let pass = reflection.techniques[0].passes[0].id;

    let mut elements =
        InputElementDescription::for_content(ContentType::Position, 0, 0, false, 0).unwrap();
    elements.extend(
        InputElementDescription::for_content(ContentType::TexCoord2D, 0, 1, false, 0).unwrap(),
    );
    assert!(device.create_input_layout(&elements, pass).is_ok());

    let normals =
        InputElementDescription::for_content(ContentType::Normal, 0, 0, false, 0).unwrap();
    assert!(matches!(
        device.create_input_layout(&normals, pass),
        Err(ResourceError::InputLayout(_))
    ));
}

#[test]
fn test_buffer_lifecycle_is_recorded() {
    let device = HeadlessDevice::new();
    let data = [0u8; 24];
    let id = device
        .create_buffer_with_data(
            &BufferDescriptor {
                label: Some("positions".into()),
                usage: BufferUsage::VERTEX | BufferUsage::CPU_WRITE,
                stride: 12,
                element_count: 2,
            },
            &data,
        )
        .unwrap();

    device.write_buffer(id, 12, &[1u8; 12]).unwrap();
    assert!(matches!(
        device.write_buffer(id, 20, &[1u8; 12]),
        Err(ResourceError::OutOfBounds)
    ));
    assert_eq!(device.buffer_data(id).unwrap()[12..], [1u8; 12]);

    device.destroy_buffer(id).unwrap();
    assert!(matches!(
        device.destroy_buffer(id),
        Err(ResourceError::NotFound)
    ));
    assert_eq!(
        device.commands().last(),
        Some(&RecordedCommand::DestroyBuffer(id))
    );
    assert_eq!(device.live_buffer_count(), 0);
}
