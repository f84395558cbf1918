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

//! Position, orientation and scale of a renderable in world space.

use enginex_core::math::{Mat4, Quaternion, Vec3};

/// A decomposed world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub orientation: Quaternion,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation or scaling.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };

    /// A transform placed at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// The world matrix, `T * R * S`.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.orientation)
            * Mat4::from_scale(self.scale)
    }

    /// Moves by `offset` in world space.
    pub fn translate(&mut self, offset: Vec3) {
        self.position = self.position + offset;
    }

    /// Moves by `offset` expressed in the local axes.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.position = self.position + self.orientation.rotate_vec3(offset);
    }

    /// Applies `rotation` after the current orientation.
    pub fn rotate(&mut self, rotation: Quaternion) {
        self.orientation = (rotation * self.orientation).normalize();
    }

    /// Rotates by `angle` radians around the world-space `axis`.
    pub fn rotate_axis_angle(&mut self, axis: Vec3, angle: f32) {
        self.rotate(Quaternion::from_axis_angle(axis, angle));
    }

    /// Sets the per-axis scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// The local forward direction, `-Z` rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation.rotate_vec3(Vec3::new(0.0, 0.0, -1.0))
    }

    /// Orients the transform so that [`Transform::forward`] points at `target`.
    ///
    /// Leaves the orientation untouched when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if (target - self.position).length() <= f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, up);
        // The view matrix is the inverse of the camera's world transform, and
        // its rotation block is orthonormal.
        let rotation = view.without_translation().transpose();
        self.orientation = quaternion_from_rotation(&rotation);
    }

    /// Interpolates position and scale linearly and orientation spherically.
    pub fn slerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            position: Vec3::lerp(a.position, b.position, t),
            orientation: Quaternion::slerp(a.orientation, b.orientation, t),
            scale: Vec3::lerp(a.scale, b.scale, t),
        }
    }
}

fn quaternion_from_rotation(m: &Mat4) -> Quaternion {
    let (m00, m11, m22) = (m.get(0, 0), m.get(1, 1), m.get(2, 2));
    let trace = m00 + m11 + m22;
    let q = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quaternion::new(
            (m.get(2, 1) - m.get(1, 2)) / s,
            (m.get(0, 2) - m.get(2, 0)) / s,
            (m.get(1, 0) - m.get(0, 1)) / s,
            0.25 * s,
        )
    } else if m00 > m11 && m00 > m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        Quaternion::new(
            0.25 * s,
            (m.get(0, 1) + m.get(1, 0)) / s,
            (m.get(0, 2) + m.get(2, 0)) / s,
            (m.get(2, 1) - m.get(1, 2)) / s,
        )
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        Quaternion::new(
            (m.get(0, 1) + m.get(1, 0)) / s,
            0.25 * s,
            (m.get(1, 2) + m.get(2, 1)) / s,
            (m.get(0, 2) - m.get(2, 0)) / s,
        )
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        Quaternion::new(
            (m.get(0, 2) + m.get(2, 0)) / s,
            (m.get(1, 2) + m.get(2, 1)) / s,
            0.25 * s,
            (m.get(1, 0) - m.get(0, 1)) / s,
        )
    };
    q.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use enginex_core::math::FRAC_PI_2;

    #[test]
    fn test_to_mat4_applies_scale_then_rotation_then_translation() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        transform.rotate_axis_angle(Vec3::Y, FRAC_PI_2);

        let p = transform.to_mat4().transform_point(Vec3::X);
        // X scaled to 2, rotated +90 degrees about Y onto -Z, then translated.
        assert_relative_eq!(p, Vec3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_translate_local_follows_orientation() {
        let mut transform = Transform::default();
        transform.rotate_axis_angle(Vec3::Y, FRAC_PI_2);
        transform.translate_local(Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(transform.position, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(transform.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        transform.look_at(Vec3::new(5.0, 0.0, 5.0), Vec3::Y);
        assert_relative_eq!(transform.forward(), Vec3::X, epsilon = 1e-5);
    }

    #[test]
    fn test_slerp_midpoint() {
        let a = Transform::default();
        let b = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let mid = Transform::slerp(&a, &b, 0.5);
        assert_relative_eq!(mid.position, Vec3::X, epsilon = 1e-6);
    }
}
