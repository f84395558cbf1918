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

//! Unit quaternions for orientations.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

use super::{Vec3, Vec4, EPSILON};

/// A rotation stored as a unit quaternion `(x, y, z, w)`.
#[derive(
    Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar part.
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components. The result is not normalized.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle` radians around `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    #[inline]
    fn as_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    #[inline]
    fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Four-dimensional dot product.
    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        self.as_vec4().dot(rhs.as_vec4())
    }

    /// Returns the quaternion scaled to unit length, or identity if degenerate.
    pub fn normalize(self) -> Self {
        let length = self.as_vec4().length();
        if length < EPSILON {
            return Self::IDENTITY;
        }
        Self::from_vec4(self.as_vec4() * (1.0 / length))
    }

    /// Returns the conjugate, which is the inverse rotation for unit quaternions.
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotates a vector by this quaternion.
    pub fn rotate_vec3(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Spherical linear interpolation along the shortest arc.
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let (a, mut b) = (start.as_vec4(), end.as_vec4());
        let mut cos_theta = a.dot(b);
        if cos_theta < 0.0 {
            b = -b;
            cos_theta = -cos_theta;
        }

        if cos_theta > 1.0 - EPSILON {
            return Self::from_vec4(Vec4::lerp(a, b, t)).normalize();
        }

        let theta = cos_theta.acos();
        let inv_sin = 1.0 / theta.sin();
        let blended = a * (((1.0 - t) * theta).sin() * inv_sin) + b * ((t * theta).sin() * inv_sin);
        Self::from_vec4(blended)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    #[test]
    fn test_rotate_x_around_z() {
        let q = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert_relative_eq!(q.rotate_vec3(Vec3::X), Vec3::Y, epsilon = 1e-5);
    }

    #[test]
    fn test_product_composes_rotations() {
        let quarter = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let half = Quaternion::from_axis_angle(Vec3::Y, PI);
        let composed = quarter * quarter;
        assert_relative_eq!(composed.dot(half).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_slerp_halfway() {
        let start = Quaternion::IDENTITY;
        let end = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let mid = Quaternion::slerp(start, end, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);
        assert_relative_eq!(mid.dot(expected), 1.0, epsilon = 1e-5);
    }
}
