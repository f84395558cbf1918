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

//! Device buffer handles, usage flags and descriptors.

use std::borrow::Cow;

/// An opaque handle to a GPU buffer owned by a [`GraphicsDevice`](crate::renderer::GraphicsDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// Flags describing how a buffer may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferUsage {
    bits: u32,
}

impl BufferUsage {
    /// No usage.
    pub const NONE: Self = Self { bits: 0 };
    /// The buffer can be bound as a vertex stream.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// The buffer can be bound as an index buffer.
    pub const INDEX: Self = Self { bits: 1 << 1 };
    /// The CPU may rewrite the contents after creation (a "dynamic" buffer).
    pub const CPU_WRITE: Self = Self { bits: 1 << 2 };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every flag of `other` is set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Describes a buffer to be created with initial contents.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// How the buffer will be used.
    pub usage: BufferUsage,
    /// The size of a single element in bytes.
    pub stride: u32,
    /// The number of elements stored in the buffer.
    pub element_count: u32,
}

impl BufferDescriptor<'_> {
    /// Total size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        u64::from(self.stride) * u64::from(self.element_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_union_contains_both() {
        let usage = BufferUsage::VERTEX | BufferUsage::CPU_WRITE;
        assert!(usage.contains(BufferUsage::VERTEX));
        assert!(usage.contains(BufferUsage::CPU_WRITE));
        assert!(!usage.contains(BufferUsage::INDEX));
    }
}
