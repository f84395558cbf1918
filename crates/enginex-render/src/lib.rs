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

//! # EngineX Render
//!
//! The rendering pipeline configuration and dispatch engine:
//!
//! - [`effects`]: materials, the parameter diff engine, effects, techniques
//!   and the effect registry with its shared per-frame parameters.
//! - [`geometry`]: typed geometry buffers, the input-layout cache, and
//!   [`PolygonSet`](geometry::PolygonSet), which validates buffers against a
//!   technique's input signatures and dispatches draws.
//! - [`queue`]: the [`Renderable`](queue::Renderable) capability and the
//!   bucketed, sorted [`RenderQueue`](queue::RenderQueue).

#![warn(missing_docs)]

pub mod effects;
pub mod geometry;
pub mod queue;

pub use effects::{Effect, EffectManager, FrameUniforms, Material, ParameterDiffer};
pub use geometry::{Camera, GeometryBuffer, InputLayoutCache, PolygonSet, Transform};
pub use queue::{RenderContext, RenderQueue, RenderType, Renderable, RenderableRef};
