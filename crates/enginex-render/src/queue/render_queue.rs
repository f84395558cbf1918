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

//! Buckets renderables by type, sorts them and dispatches their draws.

use enginex_core::renderer::RenderError;
use std::rc::Rc;

use super::renderable::{RenderContext, RenderType, RenderableRef};
use crate::effects::FrameUniforms;

fn same_renderable(a: &RenderableRef, b: &RenderableRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

fn insert_unique(bucket: &mut Vec<RenderableRef>, renderable: RenderableRef) {
    if !bucket.iter().any(|r| same_renderable(r, &renderable)) {
        bucket.push(renderable);
    }
}

/// The per-frame draw list.
///
/// A renderable sits in at most one render-type bucket: inserting one that is
/// already queued is a no-op. The queue does not own the renderables beyond
/// the shared handle.
#[derive(Debug, Default)]
pub struct RenderQueue {
    buckets: [Vec<RenderableRef>; RenderType::COUNT],
    lens_flares: Vec<RenderableRef>,
}

impl RenderQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `renderable` in the bucket of its render type.
    pub fn insert(&mut self, renderable: RenderableRef) -> Result<(), RenderError> {
        let render_type = renderable.borrow().render_type();
        self.insert_as(render_type.index(), renderable)
    }

    /// Queues `renderable` in the bucket with the raw index `render_type`.
    ///
    /// A renderable already queued in any bucket stays where it is.
    ///
    /// # Errors
    /// [`RenderError::InvalidRenderType`] if the index names no bucket.
    pub fn insert_as(
        &mut self,
        render_type: usize,
        renderable: RenderableRef,
    ) -> Result<(), RenderError> {
        let render_type = RenderType::try_from(render_type)?;
        if self.contains(&renderable) {
            return Ok(());
        }
        self.buckets[render_type.index()].push(renderable);
        Ok(())
    }

    /// Returns `true` if `renderable` is queued in one of the render-type buckets.
    pub fn contains(&self, renderable: &RenderableRef) -> bool {
        self.buckets
            .iter()
            .flatten()
            .any(|r| same_renderable(r, renderable))
    }

    /// Removes `renderable` from every bucket it is in.
    pub fn remove(&mut self, renderable: &RenderableRef) {
        for bucket in &mut self.buckets {
            bucket.retain(|r| !same_renderable(r, renderable));
        }
    }

    /// Queues `renderable` in the bucket drawn after all others.
    pub fn insert_lens_flare(&mut self, renderable: RenderableRef) {
        insert_unique(&mut self.lens_flares, renderable);
    }

    /// Removes `renderable` from the lens-flare bucket.
    pub fn remove_lens_flare(&mut self, renderable: &RenderableRef) {
        self.lens_flares.retain(|r| !same_renderable(r, renderable));
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.lens_flares.clear();
    }

    /// Total number of queued renderables.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum::<usize>() + self.lens_flares.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The renderables of one bucket, in draw order as of the last sort.
    pub fn bucket(&self, render_type: RenderType) -> &[RenderableRef] {
        &self.buckets[render_type.index()]
    }

    /// The lens-flare bucket.
    pub fn lens_flares(&self) -> &[RenderableRef] {
        &self.lens_flares
    }

    /// Orders the opaque bucket by `(effect, technique)` and the transparent
    /// bucket back to front.
    ///
    /// The opaque sort is stable. Depth is the view-space z of each
    /// renderable's position; the camera looks down `-Z`, so ascending z puts
    /// the farthest objects first.
    pub fn sort(&mut self, frame: &FrameUniforms) {
        self.buckets[RenderType::Opaque.index()].sort_by_cached_key(|r| {
            r.borrow()
                .effect_name()
                .map(|(effect, technique)| (effect.to_string(), technique.to_string()))
        });

        let transparent = &mut self.buckets[RenderType::Transparent.index()];
        let mut keyed: Vec<(f32, RenderableRef)> = transparent
            .drain(..)
            .map(|r| {
                let depth = frame.view.transform_point(r.borrow().position()).z;
                (depth, r)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        transparent.extend(keyed.into_iter().map(|(_, r)| r));
    }

    /// Sorts, writes the frame uniforms, then draws every bucket in
    /// [`RenderType`] order followed by the lens flares.
    ///
    /// Returns the number of renderables drawn. Stops at the first failing
    /// renderable.
    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<usize, RenderError> {
        self.sort(ctx.frame);
        ctx.effects.apply_frame_uniforms(ctx.frame)?;

        let mut dispatched = 0;
        for renderable in self.buckets.iter().flatten().chain(&self.lens_flares) {
            renderable.borrow().render(ctx)?;
            dispatched += 1;
        }
        log::trace!("RenderQueue: dispatched {dispatched} renderables");
        Ok(dispatched)
    }
}
