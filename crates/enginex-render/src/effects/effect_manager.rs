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

//! The registry of loaded effects and the shared parameter pool they read
//! camera and lighting state from.

use ahash::AHashMap;
use enginex_core::math::{LinearRgba, Vec4};
use enginex_core::renderer::{
    EffectDefinition, GraphicsDevice, MaterialError, ParameterDefinition, ParameterHandle,
    ParameterKind, ParameterValue, ShaderProgramDescriptor, ShaderProgramId,
    ShaderProgramSource, ShaderReflection, TextureRegistry, MAX_DIRECTIONAL_LIGHTS,
};
use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::effect::Effect;
use super::frame_uniforms::FrameUniforms;
use super::technique::Technique;

const VIEW: &str = "view";
const PROJECTION: &str = "projection";
const AMBIENT_INTENSITY: &str = "ambientLight.intensity";
const AMBIENT_COLOR: &str = "ambientLight.color";

fn directional_light_parameter(index: usize, field: &str) -> String {
    format!("directionalLights[{index}].{field}")
}

#[derive(Debug, Clone, Copy)]
struct DirectionalLightHandles {
    enabled: ParameterHandle,
    direction: ParameterHandle,
    color: ParameterHandle,
}

/// Handles into the program backing the shared parameter pool.
#[derive(Debug)]
struct SharedPool {
    program: ShaderProgramId,
    view: ParameterHandle,
    projection: ParameterHandle,
    ambient_intensity: ParameterHandle,
    ambient_color: ParameterHandle,
    directional: Vec<DirectionalLightHandles>,
}

impl SharedPool {
    fn from_reflection(reflection: &ShaderReflection) -> Result<Self, MaterialError> {
        let handle = |name: &str, kind: ParameterKind| {
            reflection
                .parameter(name)
                .filter(|p| p.default.kind() == kind)
                .map(|p| p.handle)
                .ok_or_else(|| MaterialError::MissingSharedParameter {
                    name: name.to_string(),
                })
        };

        let directional = (0..MAX_DIRECTIONAL_LIGHTS)
            .map(|i| -> Result<_, MaterialError> {
                Ok(DirectionalLightHandles {
                    enabled: handle(&directional_light_parameter(i, "enabled"), ParameterKind::Bool)?,
                    direction: handle(
                        &directional_light_parameter(i, "direction"),
                        ParameterKind::Float4,
                    )?,
                    color: handle(&directional_light_parameter(i, "color"), ParameterKind::Float4)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            program: reflection.program,
            view: handle(VIEW, ParameterKind::Matrix)?,
            projection: handle(PROJECTION, ParameterKind::Matrix)?,
            ambient_intensity: handle(AMBIENT_INTENSITY, ParameterKind::Float)?,
            ambient_color: handle(AMBIENT_COLOR, ParameterKind::Float4)?,
            directional,
        })
    }
}

/// The definition of the shared parameter pool: camera matrices, the ambient
/// light and [`MAX_DIRECTIONAL_LIGHTS`] directional light slots.
pub fn shared_pool_definition() -> EffectDefinition {
    let mut parameters = vec![
        ParameterDefinition::new(VIEW, ParameterKind::Matrix),
        ParameterDefinition::new(PROJECTION, ParameterKind::Matrix),
        ParameterDefinition::with_default(AMBIENT_INTENSITY, ParameterValue::Float(1.0)),
        ParameterDefinition::with_default(
            AMBIENT_COLOR,
            ParameterValue::Float4(LinearRgba::WHITE.into()),
        ),
    ];
    for i in 0..MAX_DIRECTIONAL_LIGHTS {
        parameters.push(ParameterDefinition::with_default(
            directional_light_parameter(i, "enabled"),
            ParameterValue::Bool(false),
        ));
        parameters.push(ParameterDefinition::new(
            directional_light_parameter(i, "direction"),
            ParameterKind::Float4,
        ));
        parameters.push(ParameterDefinition::with_default(
            directional_light_parameter(i, "color"),
            ParameterValue::Float4(LinearRgba::WHITE.into()),
        ));
    }
    EffectDefinition {
        parameters,
        techniques: Vec::new(),
    }
}

/// Owns every loaded [`Effect`], keyed by name, and the shared parameter pool.
#[derive(Debug)]
pub struct EffectManager {
    device: Arc<dyn GraphicsDevice>,
    textures: Arc<dyn TextureRegistry>,
    shared: SharedPool,
    effects: AHashMap<String, Effect>,
    effect_directory: PathBuf,
    directional_light_limit: usize,
}

impl EffectManager {
    /// Compiles the shared parameter pool and creates an empty registry.
    ///
    /// # Errors
    /// [`MaterialError::MissingSharedParameter`] if the pool program lacks one
    /// of the camera or lighting variables, or a device error.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        textures: Arc<dyn TextureRegistry>,
        shared_source: ShaderProgramSource,
    ) -> Result<Self, MaterialError> {
        let reflection = device.create_shader_program(&ShaderProgramDescriptor {
            label: Some(Cow::Borrowed("shared")),
            source: shared_source,
        })?;
        let shared = SharedPool::from_reflection(&reflection)?;
        log::info!(
            "EffectManager: shared parameter pool compiled ({:?})",
            shared.program
        );

        Ok(Self {
            device,
            textures,
            shared,
            effects: AHashMap::new(),
            effect_directory: PathBuf::new(),
            directional_light_limit: MAX_DIRECTIONAL_LIGHTS,
        })
    }

    /// Sets the directory effect files are resolved against.
    pub fn with_effect_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.effect_directory = directory.into();
        self
    }

    /// Limits how many directional light slots are written per frame. Slots
    /// past the limit are always written disabled.
    pub fn set_directional_light_limit(&mut self, limit: usize) {
        self.directional_light_limit = limit.min(MAX_DIRECTIONAL_LIGHTS);
    }

    /// The device every effect is compiled on.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// The registry texture names are resolved through.
    pub fn textures(&self) -> &Arc<dyn TextureRegistry> {
        &self.textures
    }

    /// Compiles and registers an effect, or returns the one already
    /// registered under `name`.
    pub fn create_effect(
        &mut self,
        name: &str,
        definition: EffectDefinition,
    ) -> Result<&mut Effect, MaterialError> {
        self.load(name, ShaderProgramSource::Definition(definition))
    }

    /// Like [`EffectManager::create_effect`], compiling from a file relative
    /// to the effect directory.
    pub fn create_effect_from_file(
        &mut self,
        name: &str,
        file: impl AsRef<Path>,
    ) -> Result<&mut Effect, MaterialError> {
        let path = self.effect_directory.join(file);
        self.load(name, ShaderProgramSource::File(path))
    }

    fn load(
        &mut self,
        name: &str,
        source: ShaderProgramSource,
    ) -> Result<&mut Effect, MaterialError> {
        match self.effects.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                log::debug!("EffectManager: effect '{name}' already loaded");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let reflection = self.device.create_shader_program(&ShaderProgramDescriptor {
                    label: Some(Cow::Borrowed(name)),
                    source,
                })?;
                let effect = Effect::new(
                    name,
                    self.device.clone(),
                    self.textures.clone(),
                    reflection,
                )?;
                log::info!("EffectManager: loaded effect '{name}'");
                Ok(entry.insert(effect))
            }
        }
    }

    /// Looks up an effect by name.
    pub fn effect(&self, name: &str) -> Result<&Effect, MaterialError> {
        self.effects.get(name).ok_or_else(|| unknown_effect(name))
    }

    /// Looks up an effect by name for binding.
    pub fn effect_mut(&mut self, name: &str) -> Result<&mut Effect, MaterialError> {
        self.effects.get_mut(name).ok_or_else(|| unknown_effect(name))
    }

    /// Returns `true` if an effect is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Iterates the registered effect names, in no particular order.
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// Resolves `technique` of `effect`.
    pub fn technique(&self, effect: &str, technique: &str) -> Result<Arc<Technique>, MaterialError> {
        self.effect(effect)?.technique(technique)
    }

    /// Forgets the bound parameter state of every effect, e.g. after the
    /// device recreated its programs.
    pub fn invalidate_all(&mut self) {
        for effect in self.effects.values_mut() {
            effect.invalidate_current_state();
        }
    }

    /// Writes the camera and lighting state of `frame` to the shared pool.
    pub fn apply_frame_uniforms(&self, frame: &FrameUniforms) -> Result<(), MaterialError> {
        let device = self.device.as_ref();
        let pool = &self.shared;

        device.set_matrix(pool.view, &frame.view)?;
        device.set_matrix(pool.projection, &frame.projection)?;
        device.set_float(pool.ambient_intensity, frame.ambient.intensity)?;
        device.set_float4(pool.ambient_color, &frame.ambient.color.into())?;

        let lights = frame.directional_lights().iter().enumerate();
        for ((index, light), handles) in lights.zip(&pool.directional) {
            let light = if index < self.directional_light_limit {
                *light
            } else {
                None
            };
            match light {
                Some(light) => {
                    device.set_bool(handles.enabled, true)?;
                    device.set_float4(handles.direction, &Vec4::from_vec3(light.direction, 0.0))?;
                    device.set_float4(handles.color, &light.color.into())?;
                }
                None => device.set_bool(handles.enabled, false)?,
            }
        }
        Ok(())
    }
}

fn unknown_effect(name: &str) -> MaterialError {
    MaterialError::UnknownEffect {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginex_core::math::Vec3;
    use enginex_core::renderer::{
        DirectionalLight, PassDefinition, SignatureParameter, TechniqueDefinition,
    };
    use enginex_infra::graphics::headless::{BoundValue, HeadlessDevice};
    use enginex_infra::textures::InMemoryTextureRegistry;

    fn manager(device: &Arc<HeadlessDevice>) -> EffectManager {
        EffectManager::new(
            device.clone(),
            Arc::new(InMemoryTextureRegistry::new()),
            ShaderProgramSource::Definition(shared_pool_definition()),
        )
        .unwrap()
    }

    fn unlit() -> EffectDefinition {
        EffectDefinition {
            parameters: vec![
                ParameterDefinition::new("world", ParameterKind::Matrix),
                ParameterDefinition::new("worldInverseTranspose", ParameterKind::Matrix),
                ParameterDefinition::new("tint", ParameterKind::Float4),
            ],
            techniques: vec![TechniqueDefinition {
                name: "Unlit".to_string(),
                passes: vec![PassDefinition {
                    name: "P0".to_string(),
                    inputs: vec![SignatureParameter::new("POSITION", 0)],
                }],
            }],
        }
    }

    #[test]
    fn test_create_effect_is_idempotent() {
        let device = Arc::new(HeadlessDevice::new());
        let mut effects = manager(&device);

        let first = effects.create_effect("unlit", unlit()).unwrap().program();
        let second = effects
            .create_effect("unlit", EffectDefinition::default())
            .unwrap()
            .program();
        assert_eq!(first, second);
        assert_eq!(effects.effect_names().count(), 1);
    }

    #[test]
    fn test_unknown_effect_and_technique() {
        let device = Arc::new(HeadlessDevice::new());
        let mut effects = manager(&device);
        effects.create_effect("unlit", unlit()).unwrap();

        let err = effects.effect("lit").unwrap_err();
        assert_eq!(err.to_string(), "No effect loaded by the name: lit");

        let err = effects.technique("unlit", "Lit").unwrap_err();
        assert!(matches!(err, MaterialError::UnknownTechnique { .. }));
        assert!(effects.technique("unlit", "Unlit").is_ok());
    }

    #[test]
    fn test_shared_pool_requires_light_slots() {
        let device = Arc::new(HeadlessDevice::new());
        let mut definition = shared_pool_definition();
        definition
            .parameters
            .retain(|p| p.name != "directionalLights[3].color");

        let err = EffectManager::new(
            device,
            Arc::new(InMemoryTextureRegistry::new()),
            ShaderProgramSource::Definition(definition),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not retrieve shared effect variable: directionalLights[3].color"
        );
    }

    #[test]
    fn test_apply_frame_uniforms_respects_light_limit() {
        let device = Arc::new(HeadlessDevice::new());
        let mut effects = manager(&device);
        effects.set_directional_light_limit(1);

        let mut frame = FrameUniforms::default();
        let light = DirectionalLight::new(Vec3::new(0.0, -2.0, 0.0), LinearRgba::RED);
        frame.set_directional_light(0, light).unwrap();
        frame.set_directional_light(1, light).unwrap();
        effects.apply_frame_uniforms(&frame).unwrap();

        let enabled = |i: usize| {
            let handle = effects.shared.directional[i].enabled;
            device.parameter_value(handle)
        };
        assert_eq!(enabled(0), Some(BoundValue::Bool(true)));
        assert_eq!(enabled(1), Some(BoundValue::Bool(false)));
        assert_eq!(
            device.parameter_value(effects.shared.directional[0].direction),
            Some(BoundValue::Float4(Vec4::new(0.0, -1.0, 0.0, 0.0)))
        );
    }
}
