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

//! The three-way parameter diff engine.
//!
//! Shader parameter writes are expensive state changes. [`ParameterDiffer`]
//! keeps the effect's default state and a shadow of what is currently bound
//! on the device, and decides per parameter whether binding a material needs
//! a write at all.

use enginex_core::renderer::MaterialError;

use super::material::{Attribute, Material, ParameterType};

/// The outcome of resolving one parameter of an incoming material.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    /// The entry that will be bound: the material's entry if initialized,
    /// otherwise the default. Carries the material's `initialized` flag.
    pub attribute: Attribute<T>,
    /// `true` when the resolved value differs from what the device holds.
    pub changed: bool,
}

/// Tracks default and currently bound parameter state for one effect.
#[derive(Debug, Clone)]
pub struct ParameterDiffer {
    default: Material,
    current: Material,
}

impl ParameterDiffer {
    /// Creates a differ whose current state equals `default`, i.e. a freshly
    /// compiled program holding its declared defaults.
    pub fn new(default: Material) -> Self {
        Self {
            current: default.clone(),
            default,
        }
    }

    /// The default state: every entry uninitialized, holding shader defaults.
    pub fn default_state(&self) -> &Material {
        &self.default
    }

    /// The shadow of what is currently bound on the device.
    pub fn current_state(&self) -> &Material {
        &self.current
    }

    /// Resolves the value `incoming` wants bound for `name`.
    ///
    /// # Errors
    /// [`MaterialError::UnknownAttribute`] if `name` is not a parameter of
    /// this type in the default state or in `incoming`.
    pub fn resolve<T: ParameterType>(
        &self,
        name: &str,
        incoming: &Material,
    ) -> Result<Resolution<T>, MaterialError> {
        let missing = || MaterialError::UnknownAttribute {
            kind: T::KIND,
            name: name.to_string(),
        };
        let default = self.default.attribute::<T>(name).ok_or_else(missing)?;
        let current = self.current.attribute::<T>(name).ok_or_else(missing)?;
        let requested = incoming.attribute::<T>(name).ok_or_else(missing)?;

        let attribute = if requested.initialized {
            requested.clone()
        } else {
            default.clone()
        };
        let changed = attribute.value != current.value;
        Ok(Resolution { attribute, changed })
    }

    /// Records that `attribute` is now what the device holds for `name`.
    pub fn commit<T: ParameterType>(&mut self, name: &str, attribute: Attribute<T>) {
        self.current.replace_attribute(name, attribute);
    }

    /// Forgets the bound state, e.g. after the program was recreated with its
    /// defaults.
    pub fn reset_to_defaults(&mut self) {
        self.current = self.default.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginex_core::math::Vec4;
    use enginex_core::renderer::ParameterValue;

    const WHITE: Vec4 = Vec4::ONE;
    const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);

    fn differ_and_material() -> (ParameterDiffer, Material) {
        let mut default = Material::new("fx");
        default.declare("color", ParameterValue::Float4(WHITE));
        (ParameterDiffer::new(default.clone()), default)
    }

    /// Resolves and commits like an effect does, returning whether a write happened.
    fn bind(differ: &mut ParameterDiffer, material: &Material) -> bool {
        let resolution = differ.resolve::<Vec4>("color", material).unwrap();
        let changed = resolution.changed;
        differ.commit("color", resolution.attribute);
        changed
    }

    #[test]
    fn test_uninitialized_matching_default_needs_no_write() {
        let (mut differ, material) = differ_and_material();
        assert!(!bind(&mut differ, &material));
    }

    #[test]
    fn test_default_is_restored_after_override() {
        let (mut differ, blank) = differ_and_material();
        let mut green = blank.clone();
        green.set_float4("color", GREEN).unwrap();

        assert!(bind(&mut differ, &green));
        assert_eq!(differ.current_state().attribute::<Vec4>("color").unwrap().value, GREEN);

        assert!(bind(&mut differ, &blank));
        let current = differ.current_state().attribute::<Vec4>("color").unwrap();
        assert_eq!(current.value, WHITE);
        assert!(!current.initialized);
    }

    #[test]
    fn test_identical_value_is_written_once() {
        let (mut differ, mut material) = differ_and_material();
        material.set_float4("color", GREEN).unwrap();
        assert!(bind(&mut differ, &material));
        assert!(!bind(&mut differ, &material));
    }

    #[test]
    fn test_explicit_default_value_needs_no_write() {
        let (mut differ, mut material) = differ_and_material();
        material.set_float4("color", WHITE).unwrap();
        assert!(!bind(&mut differ, &material));
        // The shadow now records the explicit flag.
        assert!(differ.current_state().is_initialized::<Vec4>("color"));
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let (differ, material) = differ_and_material();
        assert!(differ.resolve::<f32>("color", &material).is_err());
    }
}
