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

//! A perspective camera placed in the world by a [`Transform`].

use enginex_core::math::{degrees_to_radians, Mat4, Vec3};

use super::transform::Transform;

/// A free-flying perspective camera.
///
/// The camera looks down the local `-Z` axis of its transform; the scale of
/// the transform is ignored. [`Camera::view`] and [`Camera::projection`] feed
/// [`FrameUniforms::set_camera`](crate::effects::FrameUniforms::set_camera).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Position and orientation in world space.
    pub transform: Transform,
    /// The vertical field of view in radians.
    pub fov_y_radians: f32,
    /// Viewport width divided by height.
    pub aspect_ratio: f32,
    /// Distance to the near clipping plane.
    pub z_near: f32,
    /// Distance to the far clipping plane.
    pub z_far: f32,
}

impl Camera {
    /// Creates a camera at the origin looking down `-Z`.
    pub fn new_perspective(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        Self {
            transform: Transform::IDENTITY,
            fov_y_radians,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// A 60 degree, 16:9 camera clipping at 0.1 and 1000.
    pub fn default_perspective() -> Self {
        Self::new_perspective(degrees_to_radians(60.0), 16.0 / 9.0, 0.1, 1000.0)
    }

    /// Places the camera at `position`, facing `target`.
    pub fn looking_at(mut self, position: Vec3, target: Vec3, up: Vec3) -> Self {
        self.set_look_at(position, target, up);
        self
    }

    /// Moves the camera to `position` and turns it towards `target`.
    pub fn set_look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.transform.position = position;
        self.transform.look_at(target, up);
    }

    /// Updates the aspect ratio from a viewport size. A zero height is ignored.
    pub fn set_viewport(&mut self, client_width: u32, client_height: u32) {
        if client_height > 0 {
            self.aspect_ratio = client_width as f32 / client_height as f32;
        }
    }

    /// Updates the viewport size and the clipping planes, e.g. after a resize.
    pub fn set_perspective(
        &mut self,
        client_width: u32,
        client_height: u32,
        z_near: f32,
        z_far: f32,
    ) {
        self.set_viewport(client_width, client_height);
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// The world-to-view matrix, the inverse of the camera's rigid transform.
    pub fn view(&self) -> Mat4 {
        Mat4::from_quat(self.transform.orientation.conjugate())
            * Mat4::from_translation(-self.transform.position)
    }

    /// The view-to-clip matrix.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect_ratio, self.z_near, self.z_far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::default_perspective()
    }
}
