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

//! Defines the column-major [`Mat4`] type.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use super::{Quaternion, Vec3, Vec4, EPSILON};

/// A 4x4 column-major matrix used for affine and projective transformations.
///
/// Matrices multiply column vectors (`m * v`), so `a * b` applies `b` first.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Builds a matrix from row-major storage (`rows[row][col]`).
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = Self::ZERO;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m.cols[c].set(r, *value);
            }
        }
        m
    }

    /// Returns the matrix in row-major storage (`rows[row][col]`).
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.cols[c].get(r);
            }
        }
        rows
    }

    /// Returns the element at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col].get(row)
    }

    /// Sets the element at (`row`, `col`).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.cols[col].set(row, value);
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// Creates a non-uniform scale matrix.
    #[inline]
    pub fn from_scale(s: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(s.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, s.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation matrix from a unit quaternion.
    pub fn from_quat(q: Quaternion) -> Self {
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, xy, xz) = (q.x * x2, q.x * y2, q.x * z2);
        let (yy, yz, zz) = (q.y * y2, q.y * z2, q.z * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);

        Self::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// Creates a right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
        )
    }

    /// Creates a right-handed perspective projection with a `[0, 1]` depth range.
    ///
    /// `fov_y` is the vertical field of view in radians.
    pub fn perspective_rh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let range = near - far;

        Self::from_cols(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, far / range, -1.0),
            Vec4::new(0.0, 0.0, near * far / range, 0.0),
        )
    }

    /// Returns the translation part of an affine matrix.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let rows = self.to_rows();
        Self::from_cols(
            Vec4::new(rows[0][0], rows[0][1], rows[0][2], rows[0][3]),
            Vec4::new(rows[1][0], rows[1][1], rows[1][2], rows[1][3]),
            Vec4::new(rows[2][0], rows[2][1], rows[2][2], rows[2][3]),
            Vec4::new(rows[3][0], rows[3][1], rows[3][2], rows[3][3]),
        )
    }

    /// Computes the inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns `None` if the matrix is singular (a pivot smaller than [`EPSILON`]).
    pub fn inverse(&self) -> Option<Self> {
        let mut a = self.to_rows();
        let mut inv = Self::IDENTITY.to_rows();

        for col in 0..4 {
            let pivot = (col..4).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
            if a[pivot][col].abs() < EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for k in 0..4 {
                a[col][k] /= p;
                inv[col][k] /= p;
            }

            let (pivot_row, pivot_inv) = (a[col], inv[col]);
            for row in (0..4).filter(|&row| row != col) {
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    a[row][k] -= factor * pivot_row[k];
                    inv[row][k] -= factor * pivot_inv[k];
                }
            }
        }

        Some(Self::from_rows(inv))
    }

    /// Returns a copy with the translation row and column cleared and the
    /// homogeneous element set to 1, leaving only the upper-left 3x3 block.
    pub fn without_translation(&self) -> Self {
        let mut m = *self;
        for i in 0..3 {
            m.set(i, 3, 0.0);
            m.set(3, i, 0.0);
        }
        m.set(3, 3, 1.0);
        m
    }

    /// Transforms a point (w = 1), ignoring any projective component.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(p, 1.0)).truncate()
    }

    /// Transforms a direction (w = 0).
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).truncate()
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            cols: rhs.cols.map(|c| self * c),
        }
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
