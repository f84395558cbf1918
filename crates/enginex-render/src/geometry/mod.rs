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

//! Geometry: buffers, input layouts, polygon sets and the shapes and meshes
//! that feed them, placed in the world by transforms and seen through a
//! camera.

mod buffer;
mod camera;
mod input_layout_cache;
mod mesh;
mod polygon_set;
mod shapes;
mod transform;

pub use self::buffer::*;
pub use self::camera::*;
pub use self::input_layout_cache::*;
pub use self::mesh::*;
pub use self::polygon_set::*;
pub use self::shapes::*;
pub use self::transform::*;
