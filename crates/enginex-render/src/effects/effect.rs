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

//! Defines [`Effect`]: a compiled shader program plus its default and
//! currently bound parameter state.

use enginex_core::math::{Mat4, Vec4};
use enginex_core::renderer::{
    GraphicsDevice, MaterialError, ParameterHandle, ParameterKind, ShaderProgramId,
    ShaderReflection, TextureId, TextureRegistry,
};
use std::sync::Arc;

use super::material::{Attribute, Material, ParameterType, TextureName};
use super::parameter_differ::ParameterDiffer;
use super::technique::Technique;

/// Name of the reserved world matrix every effect must declare.
pub const WORLD_MATRIX: &str = "world";
/// Name of the reserved inverse-transpose world matrix every effect must declare.
pub const WORLD_INVERSE_TRANSPOSE_MATRIX: &str = "worldInverseTranspose";

/// Device handles of the tweakable parameters, grouped by type.
#[derive(Debug, Default)]
struct ParameterHandles {
    matrices: Vec<(String, ParameterHandle)>,
    bools: Vec<(String, ParameterHandle)>,
    floats: Vec<(String, ParameterHandle)>,
    float4s: Vec<(String, ParameterHandle)>,
    textures: Vec<(String, ParameterHandle)>,
}

impl ParameterHandles {
    fn push(&mut self, kind: ParameterKind, name: String, handle: ParameterHandle) {
        let list = match kind {
            ParameterKind::Matrix => &mut self.matrices,
            ParameterKind::Bool => &mut self.bools,
            ParameterKind::Float => &mut self.floats,
            ParameterKind::Float4 => &mut self.float4s,
            ParameterKind::Texture => &mut self.textures,
        };
        list.push((name, handle));
    }

    fn find(&self, name: &str) -> Option<ParameterHandle> {
        [
            &self.matrices,
            &self.bools,
            &self.floats,
            &self.float4s,
            &self.textures,
        ]
        .into_iter()
        .flatten()
        .find(|(n, _)| n == name)
        .map(|(_, handle)| *handle)
    }
}

/// A compiled shader program with its tweakable-parameter state.
///
/// The default and current states always hold exactly the program's
/// tweakable parameters, which excludes the two reserved world matrices.
/// Those are written through [`Effect::set_world_matrix`] instead.
#[derive(Debug)]
pub struct Effect {
    name: String,
    program: ShaderProgramId,
    device: Arc<dyn GraphicsDevice>,
    textures: Arc<dyn TextureRegistry>,
    differ: ParameterDiffer,
    handles: ParameterHandles,
    world: ParameterHandle,
    world_inverse_transpose: ParameterHandle,
    techniques: Vec<Arc<Technique>>,
}

impl Effect {
    /// Wraps a compiled program.
    ///
    /// Texture parameters whose declared default names a registered texture
    /// are bound immediately.
    ///
    /// # Errors
    /// [`MaterialError::MissingReservedMatrix`] if the program lacks `world`
    /// or `worldInverseTranspose` as matrices.
    pub fn new(
        name: impl Into<String>,
        device: Arc<dyn GraphicsDevice>,
        textures: Arc<dyn TextureRegistry>,
        reflection: ShaderReflection,
    ) -> Result<Self, MaterialError> {
        let name = name.into();
        let reserved = |matrix: &'static str| {
            reflection
                .parameter(matrix)
                .filter(|p| p.default.kind() == ParameterKind::Matrix)
                .map(|p| p.handle)
                .ok_or_else(|| MaterialError::MissingReservedMatrix {
                    effect: name.clone(),
                    name: matrix,
                })
        };
        let world = reserved(WORLD_MATRIX)?;
        let world_inverse_transpose = reserved(WORLD_INVERSE_TRANSPOSE_MATRIX)?;

        let mut default = Material::new(name.as_str());
        let mut handles = ParameterHandles::default();
        for parameter in reflection.parameters {
            if parameter.name == WORLD_MATRIX || parameter.name == WORLD_INVERSE_TRANSPOSE_MATRIX {
                continue;
            }
            default.declare(&parameter.name, parameter.default.clone());
            handles.push(parameter.default.kind(), parameter.name, parameter.handle);
        }

        let techniques = reflection
            .techniques
            .into_iter()
            .map(|t| Arc::new(Technique::from_reflection(&name, t)))
            .collect();

        let mut effect = Self {
            name,
            program: reflection.program,
            device,
            textures,
            differ: ParameterDiffer::new(default),
            handles,
            world,
            world_inverse_transpose,
            techniques,
        };
        effect.bind_default_textures()?;

        log::debug!(
            "Effect '{}': created with {} parameters and {} techniques",
            effect.name,
            effect.differ.default_state().len(),
            effect.techniques.len()
        );
        Ok(effect)
    }

    /// A compiled program starts with no texture bound, whatever its declared
    /// default name is. Bind the defaults that resolve and record the rest as
    /// unbound so the next material bind retries them.
    fn bind_default_textures(&mut self) -> Result<(), MaterialError> {
        for (name, handle) in &self.handles.textures {
            let Some(Attribute {
                value: Some(texture),
                ..
            }) = self.differ.default_state().attribute::<TextureName>(name)
            else {
                continue;
            };

            match self.textures.resolve(texture) {
                Some(id) => self.device.set_texture(*handle, Some(id))?,
                None => {
                    log::warn!(
                        "Effect '{}': default texture '{}' of '{}' is not registered",
                        self.name,
                        texture,
                        name
                    );
                    self.differ
                        .commit::<TextureName>(name, Attribute::uninitialized(None));
                }
            }
        }
        Ok(())
    }

    /// The effect name materials are matched against.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device handle of the compiled program.
    pub fn program(&self) -> ShaderProgramId {
        self.program
    }

    /// Creates a material with one uninitialized entry per tweakable parameter,
    /// each holding the shader default.
    pub fn create_material(&self) -> Material {
        self.differ.default_state().clone()
    }

    /// Creates a material for this effect from a material of another effect.
    // TODO: carry over the values of parameters both effects declare with the same type.
    pub fn create_material_from(&self, other: &Material) -> Material {
        log::debug!(
            "Effect '{}': converting material of '{}' yields a blank material",
            self.name,
            other.effect_name()
        );
        self.create_material()
    }

    /// The default state: all entries uninitialized, holding shader defaults.
    pub fn default_state(&self) -> &Material {
        self.differ.default_state()
    }

    /// The shadow of what is currently bound on the device.
    pub fn current_state(&self) -> &Material {
        self.differ.current_state()
    }

    /// Forgets the bound state after the device program was reset to defaults.
    pub fn invalidate_current_state(&mut self) {
        self.differ.reset_to_defaults();
    }

    /// Returns the device handle of a tweakable parameter.
    pub fn parameter_handle(&self, name: &str) -> Option<ParameterHandle> {
        self.handles.find(name)
    }

    /// Looks up a technique by name.
    pub fn technique(&self, name: &str) -> Result<Arc<Technique>, MaterialError> {
        self.techniques
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| MaterialError::UnknownTechnique {
                effect: self.name.clone(),
                technique: name.to_string(),
            })
    }

    /// Iterates the technique names in declaration order.
    pub fn technique_names(&self) -> impl Iterator<Item = &str> {
        self.techniques.iter().map(|t| t.name())
    }

    /// Binds `material`, writing only parameters whose resolved value differs
    /// from what the device currently holds.
    ///
    /// Per parameter, an initialized entry resolves to the material's value
    /// and an uninitialized one to the default, so values set by a previously
    /// bound material never bleed through.
    ///
    /// # Errors
    /// * [`MaterialError::IncompatibleMaterial`] if `material` was created by another effect.
    /// * [`MaterialError::UnknownTexture`] if a texture name is not registered.
    /// * [`MaterialError::Resource`] if the device rejects a write.
    pub fn set_material(&mut self, material: &Material) -> Result<(), MaterialError> {
        if material.effect_name() != self.name {
            return Err(MaterialError::IncompatibleMaterial {
                material_effect: material.effect_name().to_string(),
                effect: self.name.clone(),
            });
        }

        let device = self.device.as_ref();
        let textures = self.textures.as_ref();
        let handles = &self.handles;
        let differ = &mut self.differ;

        let mut writes = bind_changed::<Mat4>(differ, material, &handles.matrices, |h, v| {
            Ok(device.set_matrix(h, v)?)
        })?;
        writes += bind_changed::<bool>(differ, material, &handles.bools, |h, v| {
            Ok(device.set_bool(h, *v)?)
        })?;
        writes += bind_changed::<f32>(differ, material, &handles.floats, |h, v| {
            Ok(device.set_float(h, *v)?)
        })?;
        writes += bind_changed::<Vec4>(differ, material, &handles.float4s, |h, v| {
            Ok(device.set_float4(h, v)?)
        })?;
        writes += bind_changed::<TextureName>(differ, material, &handles.textures, |h, v| {
            let texture = v
                .as_deref()
                .map(|name| resolve_texture(textures, name))
                .transpose()?;
            Ok(device.set_texture(h, texture)?)
        })?;

        log::trace!("Effect '{}': material bound with {writes} writes", self.name);
        Ok(())
    }

    /// Writes the reserved `world` and `worldInverseTranspose` matrices.
    ///
    /// The inverse transpose is taken of the upper-left 3x3 block only, so
    /// normals are unaffected by translation. A singular world matrix falls
    /// back to identity for the normal matrix.
    pub fn set_world_matrix(&self, world: &Mat4) -> Result<(), MaterialError> {
        let normal_matrix = world
            .without_translation()
            .inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(|| {
                log::warn!(
                    "Effect '{}': world matrix is singular, using identity normal matrix",
                    self.name
                );
                Mat4::IDENTITY
            });

        self.device.set_matrix(self.world, world)?;
        self.device
            .set_matrix(self.world_inverse_transpose, &normal_matrix)?;
        Ok(())
    }
}

/// Resolves and commits every parameter of one type, invoking `write` for the
/// ones that changed. Returns the number of writes issued.
fn bind_changed<T: ParameterType>(
    differ: &mut ParameterDiffer,
    material: &Material,
    handles: &[(String, ParameterHandle)],
    mut write: impl FnMut(ParameterHandle, &T) -> Result<(), MaterialError>,
) -> Result<usize, MaterialError> {
    let mut writes = 0;
    for (name, handle) in handles {
        let resolution = differ.resolve::<T>(name, material)?;
        if resolution.changed {
            write(*handle, &resolution.attribute.value)?;
            writes += 1;
        }
        differ.commit(name, resolution.attribute);
    }
    Ok(writes)
}

fn resolve_texture(textures: &dyn TextureRegistry, name: &str) -> Result<TextureId, MaterialError> {
    textures
        .resolve(name)
        .ok_or_else(|| MaterialError::UnknownTexture {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use enginex_core::math::{Quaternion, Vec3};
    use enginex_core::renderer::{
        EffectDefinition, ParameterDefinition, ParameterValue, ShaderProgramDescriptor,
        ShaderProgramSource,
    };
    use enginex_infra::graphics::headless::{BoundValue, HeadlessDevice};
    use enginex_infra::textures::InMemoryTextureRegistry;

    fn compile(
        device: &HeadlessDevice,
        parameters: Vec<ParameterDefinition>,
    ) -> ShaderReflection {
        let descriptor = ShaderProgramDescriptor {
            label: Some("test".into()),
            source: ShaderProgramSource::Definition(EffectDefinition {
                parameters,
                techniques: Vec::new(),
            }),
        };
        device.create_shader_program(&descriptor).unwrap()
    }

    fn reserved() -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::new(WORLD_MATRIX, ParameterKind::Matrix),
            ParameterDefinition::new(WORLD_INVERSE_TRANSPOSE_MATRIX, ParameterKind::Matrix),
        ]
    }

    #[test]
    fn test_missing_reserved_matrix_is_rejected() {
        let device = Arc::new(HeadlessDevice::new());
        let reflection = compile(
            &device,
            vec![ParameterDefinition::new(WORLD_MATRIX, ParameterKind::Matrix)],
        );
        let err = Effect::new(
            "fx",
            device,
            Arc::new(InMemoryTextureRegistry::new()),
            reflection,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MaterialError::MissingReservedMatrix { name: WORLD_INVERSE_TRANSPOSE_MATRIX, .. }
        ));
    }

    #[test]
    fn test_reserved_matrices_are_not_tweakable() {
        let device = Arc::new(HeadlessDevice::new());
        let mut parameters = reserved();
        parameters.push(ParameterDefinition::new("tile", ParameterKind::Float));
        let reflection = compile(&device, parameters);
        let effect = Effect::new(
            "fx",
            device,
            Arc::new(InMemoryTextureRegistry::new()),
            reflection,
        )
        .unwrap();

        let material = effect.create_material();
        assert_eq!(material.len(), 1);
        assert!(material.attribute::<Mat4>(WORLD_MATRIX).is_none());
        assert!(material.attribute::<f32>("tile").is_some());
    }

    #[test]
    fn test_world_inverse_transpose_ignores_translation() {
        let device = Arc::new(HeadlessDevice::new());
        let reflection = compile(&device, reserved());
        let normal_handle = reflection
            .parameter(WORLD_INVERSE_TRANSPOSE_MATRIX)
            .unwrap()
            .handle;
        let effect = Effect::new(
            "fx",
            device.clone(),
            Arc::new(InMemoryTextureRegistry::new()),
            reflection,
        )
        .unwrap();

        let rotation = Mat4::from_quat(Quaternion::from_axis_angle(Vec3::Y, 0.5));
        let world = Mat4::from_translation(Vec3::new(10.0, 0.0, -3.0)) * rotation;
        effect.set_world_matrix(&world).unwrap();

        // A pure rotation is its own inverse transpose.
        let Some(BoundValue::Matrix(bound)) = device.parameter_value(normal_handle) else {
            panic!("normal matrix was not written");
        };
        assert_relative_eq!(bound, rotation, epsilon = 1e-5);
    }

    #[test]
    fn test_unregistered_texture_fails_to_bind() {
        let device = Arc::new(HeadlessDevice::new());
        let mut parameters = reserved();
        parameters.push(ParameterDefinition::new("diffuseTexture", ParameterKind::Texture));
        let reflection = compile(&device, parameters);
        let mut effect = Effect::new(
            "fx",
            device,
            Arc::new(InMemoryTextureRegistry::new()),
            reflection,
        )
        .unwrap();

        let mut material = effect.create_material();
        material.set_texture_name("diffuseTexture", "missing").unwrap();
        let err = effect.set_material(&material).unwrap_err();
        assert!(matches!(err, MaterialError::UnknownTexture { .. }));
        // Nothing was committed for the failed parameter.
        assert!(!effect.current_state().is_initialized::<TextureName>("diffuseTexture"));
    }

    #[test]
    fn test_default_texture_is_bound_at_creation() {
        let device = Arc::new(HeadlessDevice::new());
        let textures = Arc::new(InMemoryTextureRegistry::new());
        let stars = textures.register("stars");
        let mut parameters = reserved();
        parameters.push(ParameterDefinition::with_default(
            "diffuseTexture",
            ParameterValue::Texture(Some("stars".to_string())),
        ));
        let reflection = compile(&device, parameters);
        let handle = reflection.parameter("diffuseTexture").unwrap().handle;

        Effect::new("fx", device.clone(), textures, reflection).unwrap();
        assert_eq!(
            device.parameter_value(handle),
            Some(BoundValue::Texture(Some(stars)))
        );
    }
}
