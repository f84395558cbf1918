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

//! The capability every queued object implements.

use enginex_core::math::{Mat4, Vec3};
use enginex_core::renderer::RenderError;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::effects::{EffectManager, FrameUniforms, Material};

/// The bucket a renderable is drawn from. Buckets are drawn in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderType {
    /// Solid geometry, grouped by effect and technique.
    #[default]
    Opaque,
    /// Alpha-blended geometry, drawn back to front.
    Transparent,
    /// Screen-space elements drawn over the scene.
    Screen,
    /// User interface, drawn last among the buckets.
    Ui,
}

impl RenderType {
    /// Number of render types.
    pub const COUNT: usize = 4;

    /// Every render type, in draw order.
    pub const ALL: [RenderType; Self::COUNT] = [
        RenderType::Opaque,
        RenderType::Transparent,
        RenderType::Screen,
        RenderType::Ui,
    ];

    /// The bucket index of this render type.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a raw bucket index back to its render type.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl TryFrom<usize> for RenderType {
    type Error = RenderError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(RenderError::InvalidRenderType(index))
    }
}

/// What a renderable needs while drawing: the effects to bind and the frame
/// being drawn.
#[derive(Debug)]
pub struct RenderContext<'a> {
    /// The effect registry.
    pub effects: &'a mut EffectManager,
    /// Camera and lighting for the current frame.
    pub frame: &'a FrameUniforms,
}

impl<'a> RenderContext<'a> {
    /// Creates a context for one frame.
    pub fn new(effects: &'a mut EffectManager, frame: &'a FrameUniforms) -> Self {
        Self { effects, frame }
    }
}

/// An object the [`RenderQueue`](super::RenderQueue) can sort and draw.
pub trait Renderable: Debug {
    /// Issues the draw calls for this object.
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError>;

    /// The bucket this object belongs to.
    fn render_type(&self) -> RenderType;

    /// The world matrix.
    fn transform(&self) -> Mat4;

    /// The world-space position used for depth sorting.
    fn position(&self) -> Vec3 {
        self.transform().translation()
    }

    /// The `(effect, technique)` pair used for state sorting, if any.
    fn effect_name(&self) -> Option<(&str, &str)> {
        None
    }

    /// The material bound when drawing, if any.
    fn material(&self) -> Option<&Material> {
        None
    }
}

/// A renderable shared between its owner and the queue.
pub type RenderableRef = Rc<RefCell<dyn Renderable>>;
