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

//! Defines [`Material`], the typed parameter set an effect binds.
//!
//! A material holds one entry per tweakable parameter of the effect that
//! created it, split into five typed tables. Every entry carries an
//! `initialized` flag separating "use the effect's default" from "explicitly
//! set by the owner".

use ahash::AHashMap;
use enginex_core::math::{Mat4, Vec4};
use enginex_core::renderer::{MaterialError, ParameterKind, ParameterValue};
use std::fmt::Debug;

/// One material entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<T> {
    /// `false` while the entry inherits the effect default.
    pub initialized: bool,
    /// The stored value. For uninitialized entries this is the effect default.
    pub value: T,
}

impl<T> Attribute<T> {
    /// An entry inheriting the effect default `value`.
    pub fn uninitialized(value: T) -> Self {
        Self {
            initialized: false,
            value,
        }
    }

    /// An explicitly set entry.
    pub fn initialized(value: T) -> Self {
        Self {
            initialized: true,
            value,
        }
    }
}

/// A table of entries of one parameter type, keyed by parameter name.
pub type ParameterTable<T> = AHashMap<String, Attribute<T>>;

/// A texture reference by registry name. `None` is the explicit "no texture" state.
pub type TextureName = Option<String>;

/// A value type that can be stored in a [`Material`].
///
/// Implemented for the five parameter types: `Mat4`, `bool`, `f32`, `Vec4`
/// and [`TextureName`]. Each picks its table out of a material, which lets
/// the effect and the diff engine handle all five types with one generic path.
pub trait ParameterType: Clone + PartialEq + Debug + 'static {
    /// The parameter kind this type stores.
    const KIND: ParameterKind;

    /// The table holding entries of this type.
    fn table(material: &Material) -> &ParameterTable<Self>;

    /// The table holding entries of this type, mutably.
    fn table_mut(material: &mut Material) -> &mut ParameterTable<Self>;

    /// Extracts a value of this type, if `value` is of the matching kind.
    fn from_value(value: ParameterValue) -> Option<Self>;
}

macro_rules! impl_parameter_type {
    ($ty:ty, $kind:ident, $field:ident, $pattern:pat => $out:expr) => {
        impl ParameterType for $ty {
            const KIND: ParameterKind = ParameterKind::$kind;

            fn table(material: &Material) -> &ParameterTable<Self> {
                &material.$field
            }

            fn table_mut(material: &mut Material) -> &mut ParameterTable<Self> {
                &mut material.$field
            }

            fn from_value(value: ParameterValue) -> Option<Self> {
                match value {
                    $pattern => Some($out),
                    _ => None,
                }
            }
        }
    };
}

impl_parameter_type!(Mat4, Matrix, matrices, ParameterValue::Matrix(m) => m);
impl_parameter_type!(bool, Bool, bools, ParameterValue::Bool(b) => b);
impl_parameter_type!(f32, Float, floats, ParameterValue::Float(f) => f);
impl_parameter_type!(Vec4, Float4, float4s, ParameterValue::Float4(v) => v);
impl_parameter_type!(TextureName, Texture, textures, ParameterValue::Texture(t) => t);

/// A named, typed set of values for the tweakable parameters of one effect.
///
/// Materials are created by [`Effect::create_material`](super::Effect::create_material)
/// with every entry uninitialized, and may only be bound to that effect.
///
/// ```compile_fail
/// let material = enginex_render::Material::default();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    effect_name: String,
    matrices: ParameterTable<Mat4>,
    bools: ParameterTable<bool>,
    floats: ParameterTable<f32>,
    float4s: ParameterTable<Vec4>,
    textures: ParameterTable<TextureName>,
}

impl Material {
    pub(crate) fn new(effect_name: impl Into<String>) -> Self {
        Self {
            effect_name: effect_name.into(),
            matrices: ParameterTable::default(),
            bools: ParameterTable::default(),
            floats: ParameterTable::default(),
            float4s: ParameterTable::default(),
            textures: ParameterTable::default(),
        }
    }

    /// Adds an uninitialized entry holding `default`.
    pub(crate) fn declare(&mut self, name: &str, default: ParameterValue) {
        let name = name.to_string();
        match default {
            ParameterValue::Matrix(v) => {
                self.matrices.insert(name, Attribute::uninitialized(v));
            }
            ParameterValue::Bool(v) => {
                self.bools.insert(name, Attribute::uninitialized(v));
            }
            ParameterValue::Float(v) => {
                self.floats.insert(name, Attribute::uninitialized(v));
            }
            ParameterValue::Float4(v) => {
                self.float4s.insert(name, Attribute::uninitialized(v));
            }
            ParameterValue::Texture(v) => {
                self.textures.insert(name, Attribute::uninitialized(v));
            }
        }
    }

    /// The name of the effect this material can be bound to.
    pub fn effect_name(&self) -> &str {
        &self.effect_name
    }

    /// Returns the raw entry for `name`, initialized or not.
    pub fn attribute<T: ParameterType>(&self, name: &str) -> Option<&Attribute<T>> {
        T::table(self).get(name)
    }

    pub(crate) fn replace_attribute<T: ParameterType>(&mut self, name: &str, attribute: Attribute<T>) {
        if let Some(entry) = T::table_mut(self).get_mut(name) {
            *entry = attribute;
        }
    }

    /// Explicitly sets the value of `name` and marks it initialized.
    ///
    /// # Errors
    /// [`MaterialError::UnknownAttribute`] if the effect has no parameter of
    /// this type named `name`.
    pub fn set<T: ParameterType>(&mut self, name: &str, value: T) -> Result<(), MaterialError> {
        let entry = T::table_mut(self)
            .get_mut(name)
            .ok_or_else(|| unknown::<T>(name))?;
        *entry = Attribute::initialized(value);
        Ok(())
    }

    /// Returns the explicitly set value of `name`.
    ///
    /// # Errors
    /// [`MaterialError::UnknownAttribute`] if there is no such parameter, and
    /// [`MaterialError::UninitializedAttribute`] if it still inherits the default.
    pub fn get<T: ParameterType>(&self, name: &str) -> Result<&T, MaterialError> {
        let entry = self.attribute::<T>(name).ok_or_else(|| unknown::<T>(name))?;
        if !entry.initialized {
            return Err(MaterialError::UninitializedAttribute {
                kind: T::KIND,
                name: name.to_string(),
            });
        }
        Ok(&entry.value)
    }

    /// Returns `true` if `name` exists and has been explicitly set.
    pub fn is_initialized<T: ParameterType>(&self, name: &str) -> bool {
        self.attribute::<T>(name).is_some_and(|a| a.initialized)
    }

    /// Marks `name` uninitialized again so the effect default is bound.
    ///
    /// The stored value is left untouched; it is ignored while uninitialized.
    pub fn reset<T: ParameterType>(&mut self, name: &str) -> Result<(), MaterialError> {
        let entry = T::table_mut(self)
            .get_mut(name)
            .ok_or_else(|| unknown::<T>(name))?;
        entry.initialized = false;
        Ok(())
    }

    /// Iterates the parameter names of one type.
    pub fn names<T: ParameterType>(&self) -> impl Iterator<Item = &str> {
        T::table(self).keys().map(String::as_str)
    }

    /// Total number of entries across all five tables.
    pub fn len(&self) -> usize {
        self.matrices.len()
            + self.bools.len()
            + self.floats.len()
            + self.float4s.len()
            + self.textures.len()
    }

    /// Returns `true` if the effect has no tweakable parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets a matrix parameter.
    pub fn set_matrix(&mut self, name: &str, value: Mat4) -> Result<(), MaterialError> {
        self.set(name, value)
    }

    /// Sets a bool parameter.
    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<(), MaterialError> {
        self.set(name, value)
    }

    /// Sets a float parameter.
    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), MaterialError> {
        self.set(name, value)
    }

    /// Sets a float4 parameter.
    pub fn set_float4(&mut self, name: &str, value: impl Into<Vec4>) -> Result<(), MaterialError> {
        self.set(name, value.into())
    }

    /// Points a texture parameter at the registry texture `texture`.
    pub fn set_texture_name(
        &mut self,
        name: &str,
        texture: impl Into<String>,
    ) -> Result<(), MaterialError> {
        self.set::<TextureName>(name, Some(texture.into()))
    }

    /// Explicitly binds no texture to a texture parameter.
    pub fn clear_texture(&mut self, name: &str) -> Result<(), MaterialError> {
        self.set::<TextureName>(name, None)
    }

    /// Returns an explicitly set matrix parameter.
    pub fn matrix(&self, name: &str) -> Result<Mat4, MaterialError> {
        self.get::<Mat4>(name).copied()
    }

    /// Returns an explicitly set bool parameter.
    pub fn boolean(&self, name: &str) -> Result<bool, MaterialError> {
        self.get::<bool>(name).copied()
    }

    /// Returns an explicitly set float parameter.
    pub fn float(&self, name: &str) -> Result<f32, MaterialError> {
        self.get::<f32>(name).copied()
    }

    /// Returns an explicitly set float4 parameter.
    pub fn float4(&self, name: &str) -> Result<Vec4, MaterialError> {
        self.get::<Vec4>(name).copied()
    }

    /// Returns an explicitly set texture parameter.
    pub fn texture_name(&self, name: &str) -> Result<Option<&str>, MaterialError> {
        self.get::<TextureName>(name).map(|t| t.as_deref())
    }
}

fn unknown<T: ParameterType>(name: &str) -> MaterialError {
    MaterialError::UnknownAttribute {
        kind: T::KIND,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_material() -> Material {
        let mut material = Material::new("standard");
        material.declare("diffuseColor", ParameterValue::Float4(Vec4::ONE));
        material.declare("diffuseMapped", ParameterValue::Bool(false));
        material.declare("diffuseTexture", ParameterValue::Texture(None));
        material
    }

    #[test]
    fn test_new_material_is_bound_to_its_effect() {
        let material = Material::new("standard");
        assert_eq!(material.effect_name(), "standard");
        assert_eq!(material.len(), 0);
    }

    #[test]
    fn test_declared_entries_start_uninitialized() {
        let material = test_material();
        assert_eq!(material.len(), 3);
        assert!(!material.is_initialized::<Vec4>("diffuseColor"));
        assert!(matches!(
            material.float4("diffuseColor"),
            Err(MaterialError::UninitializedAttribute { kind: ParameterKind::Float4, .. })
        ));
    }

    #[test]
    fn test_set_marks_initialized() {
        let mut material = test_material();
        material
            .set_float4("diffuseColor", Vec4::new(0.0, 1.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(
            material.float4("diffuseColor").unwrap(),
            Vec4::new(0.0, 1.0, 0.0, 1.0)
        );
        material.set_texture_name("diffuseTexture", "stars").unwrap();
        assert_eq!(material.texture_name("diffuseTexture").unwrap(), Some("stars"));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let mut material = test_material();
        let err = material.set_float("specularExponent", 15.0).unwrap_err();
        assert!(matches!(err, MaterialError::UnknownAttribute { kind: ParameterKind::Float, .. }));
        // Same name, wrong type.
        assert!(material.set_bool("diffuseColor", true).is_err());
    }

    #[test]
    fn test_reset_restores_inheritance() {
        let mut material = test_material();
        material.set_bool("diffuseMapped", true).unwrap();
        material.reset::<bool>("diffuseMapped").unwrap();
        assert!(!material.is_initialized::<bool>("diffuseMapped"));
    }
}
