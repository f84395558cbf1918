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

//! Light sources written to the shared parameter pool once per frame.

use crate::math::{LinearRgba, Vec3};

/// Number of directional light slots the shared parameter pool exposes.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 8;

/// Uniform light applied to every surface regardless of orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// The color of the light.
    pub color: LinearRgba,
    /// Multiplier applied to `color`.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: LinearRgba::WHITE,
            intensity: 1.0,
        }
    }
}

/// A light source infinitely far away, illuminating from a uniform direction.
///
/// # Examples
///
/// ```
/// use enginex_core::renderer::light::DirectionalLight;
/// use enginex_core::math::{LinearRgba, Vec3};
///
/// let sun = DirectionalLight::new(Vec3::new(-0.5, -1.0, -0.3), LinearRgba::WHITE);
/// assert!((sun.direction.length() - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The direction the light travels, normalized.
    pub direction: Vec3,
    /// The color of the light.
    pub color: LinearRgba,
}

impl DirectionalLight {
    /// Creates a directional light, normalizing `direction`.
    pub fn new(direction: Vec3, color: LinearRgba) -> Self {
        Self {
            direction: direction.normalize(),
            color,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -1.0, -0.5), LinearRgba::WHITE)
    }
}

/// A local light emitting in all directions from a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position of the light.
    pub position: Vec3,
    /// The color of the light.
    pub color: LinearRgba,
    /// Distance beyond which the light contributes nothing.
    pub range: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: LinearRgba::WHITE,
            range: 10.0,
        }
    }
}
