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

//! Name-based lookup of bindable textures.

use crate::renderer::api::TextureId;
use std::fmt::Debug;

/// Resolves texture names to device texture handles.
///
/// Texture loading and decoding live behind this trait; the engine only asks
/// whether a name exists and which handle to bind for it.
pub trait TextureRegistry: Send + Sync + Debug {
    /// Returns the handle registered under `name`.
    fn resolve(&self, name: &str) -> Option<TextureId>;

    /// Returns `true` if a texture is registered under `name`.
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}
