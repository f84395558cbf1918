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

//! # EngineX Infra
//!
//! Concrete implementations of the collaborators the render engine consumes
//! through `enginex-core` traits:
//!
//! - [`graphics::headless::HeadlessDevice`]: a [`GraphicsDevice`](enginex_core::renderer::GraphicsDevice)
//!   that validates and records every command without a GPU.
//! - [`textures::InMemoryTextureRegistry`]: a name-to-handle texture registry.
//! - [`effects`] and [`config`]: RON loaders for effect definitions and settings.

#![warn(missing_docs)]

pub mod config;
pub mod effects;
pub mod graphics;
pub mod textures;

pub use graphics::headless::HeadlessDevice;
pub use textures::InMemoryTextureRegistry;
