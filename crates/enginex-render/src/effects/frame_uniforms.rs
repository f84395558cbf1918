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

//! Per-frame values written to the shared parameter pool.

use enginex_core::math::Mat4;
use enginex_core::renderer::{
    AmbientLight, DirectionalLight, MaterialError, MAX_DIRECTIONAL_LIGHTS,
};

use crate::geometry::Camera;

/// Camera and lighting state shared by every effect for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    /// World-to-view transform.
    pub view: Mat4,
    /// View-to-clip transform.
    pub projection: Mat4,
    /// The ambient term.
    pub ambient: AmbientLight,
    directional: [Option<DirectionalLight>; MAX_DIRECTIONAL_LIGHTS],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            ambient: AmbientLight::default(),
            directional: [None; MAX_DIRECTIONAL_LIGHTS],
        }
    }
}

impl FrameUniforms {
    /// Takes the view and projection matrices from `camera`.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.set_view_projection(camera.view(), camera.projection());
    }

    /// Sets the view and projection matrices directly.
    pub fn set_view_projection(&mut self, view: Mat4, projection: Mat4) {
        self.view = view;
        self.projection = projection;
    }

    /// Enables the directional light slot `index`.
    pub fn set_directional_light(
        &mut self,
        index: usize,
        light: DirectionalLight,
    ) -> Result<(), MaterialError> {
        let slot = self
            .directional
            .get_mut(index)
            .ok_or(MaterialError::LightIndexOutOfRange { index })?;
        *slot = Some(light);
        Ok(())
    }

    /// Disables the directional light slot `index`. Out-of-range indices are ignored.
    pub fn clear_directional_light(&mut self, index: usize) {
        if let Some(slot) = self.directional.get_mut(index) {
            *slot = None;
        }
    }

    /// The directional light slots; `None` marks a disabled slot.
    pub fn directional_lights(&self) -> &[Option<DirectionalLight>] {
        &self.directional
    }

    /// Number of enabled directional lights.
    pub fn active_directional_lights(&self) -> usize {
        self.directional.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginex_core::math::{LinearRgba, Vec3};

    #[test]
    fn test_camera_matrices_are_copied() {
        let mut camera =
            Camera::default().looking_at(Vec3::new(0.0, 3.0, 8.0), Vec3::ZERO, Vec3::Y);
        camera.set_viewport(1280, 720);

        let mut frame = FrameUniforms::default();
        frame.set_camera(&camera);
        assert_eq!(frame.view, camera.view());
        assert_eq!(frame.projection, camera.projection());
    }

    #[test]
    fn test_directional_light_slots() {
        let mut frame = FrameUniforms::default();
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0), LinearRgba::WHITE);

        frame.set_directional_light(0, light).unwrap();
        frame.set_directional_light(7, light).unwrap();
        assert_eq!(frame.active_directional_lights(), 2);

        let err = frame.set_directional_light(8, light).unwrap_err();
        assert!(matches!(err, MaterialError::LightIndexOutOfRange { index: 8 }));

        frame.clear_directional_light(0);
        frame.clear_directional_light(42);
        assert_eq!(frame.active_directional_lights(), 1);
        assert!(frame.directional_lights()[7].is_some());
    }
}
