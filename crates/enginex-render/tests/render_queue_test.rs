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

//! Integration tests for bucketing, sorting and dispatch of the render queue.

use enginex_core::math::{LinearRgba, Mat4, Vec3};
use enginex_core::renderer::{
    DirectionalLight, EffectDefinition, ParameterDefinition, ParameterKind, PassDefinition,
    PrimitiveTopology, RenderError, ShaderProgramSource, SignatureParameter, TechniqueDefinition,
};
use enginex_infra::HeadlessDevice;
use enginex_infra::InMemoryTextureRegistry;
use enginex_render::effects::shared_pool_definition;
use enginex_render::{
    Camera, EffectManager, FrameUniforms, GeometryBuffer, InputLayoutCache, PolygonSet,
    RenderContext, RenderQueue, RenderType, Renderable, RenderableRef,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

type DrawLog = Rc<RefCell<Vec<String>>>;

/// Records its name when drawn.
#[derive(Debug)]
struct Probe {
    name: String,
    render_type: RenderType,
    position: Vec3,
    effect: Option<(String, String)>,
    fail: bool,
    log: DrawLog,
}

impl Probe {
    fn new(name: &str, render_type: RenderType, log: &DrawLog) -> Self {
        Self {
            name: name.to_string(),
            render_type,
            position: Vec3::ZERO,
            effect: None,
            fail: false,
            log: log.clone(),
        }
    }

    fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    fn with_effect(mut self, effect: &str, technique: &str) -> Self {
        self.effect = Some((effect.to_string(), technique.to_string()));
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn into_ref(self) -> RenderableRef {
        Rc::new(RefCell::new(self))
    }
}

impl Renderable for Probe {
    fn render(&self, _ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::NoMaterial);
        }
        self.log.borrow_mut().push(self.name.clone());
        Ok(())
    }

    fn render_type(&self) -> RenderType {
        self.render_type
    }

    fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }

    fn effect_name(&self) -> Option<(&str, &str)> {
        self.effect.as_ref().map(|(e, t)| (e.as_str(), t.as_str()))
    }
}

fn effect_manager(device: &Arc<HeadlessDevice>) -> EffectManager {
    EffectManager::new(
        device.clone(),
        Arc::new(InMemoryTextureRegistry::new()),
        ShaderProgramSource::Definition(shared_pool_definition()),
    )
    .unwrap()
}

fn render(
    queue: &mut RenderQueue,
    effects: &mut EffectManager,
    frame: &FrameUniforms,
) -> Result<usize, RenderError> {
    let mut ctx = RenderContext::new(effects, frame);
    queue.render(&mut ctx)
}

#[test]
fn test_insert_is_idempotent() {
    let log = DrawLog::default();
    let probe = Probe::new("a", RenderType::Opaque, &log).into_ref();
    let mut queue = RenderQueue::new();

    queue.insert(probe.clone()).unwrap();
    queue.insert(probe.clone()).unwrap();
    assert_eq!(queue.len(), 1);

    queue.remove(&probe);
    assert!(queue.is_empty());
}

#[test]
fn test_renderable_queued_under_another_bucket_is_drawn_once() {
    let log = DrawLog::default();
    let probe = Probe::new("a", RenderType::Opaque, &log).into_ref();
    let mut queue = RenderQueue::new();

    queue
        .insert_as(RenderType::Screen.index(), probe.clone())
        .unwrap();
    queue.insert(probe.clone()).unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue.contains(&probe));
    assert!(queue.bucket(RenderType::Opaque).is_empty());

    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    let frame = FrameUniforms::default();
    assert_eq!(render(&mut queue, &mut effects, &frame).unwrap(), 1);
    assert_eq!(*log.borrow(), vec!["a"]);

    queue.remove(&probe);
    assert!(!queue.contains(&probe));
}

#[test]
fn test_invalid_bucket_index_is_rejected() {
    let log = DrawLog::default();
    let mut queue = RenderQueue::new();
    let err = queue
        .insert_as(4, Probe::new("a", RenderType::Opaque, &log).into_ref())
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidRenderType(4)));

    queue
        .insert_as(
            RenderType::Ui.index(),
            Probe::new("b", RenderType::Opaque, &log).into_ref(),
        )
        .unwrap();
    assert_eq!(queue.bucket(RenderType::Ui).len(), 1);
    assert!(queue.bucket(RenderType::Opaque).is_empty());
}

#[test]
fn test_opaque_bucket_is_grouped_by_effect_and_technique() {
    let log = DrawLog::default();
    let mut queue = RenderQueue::new();
    for (name, effect, technique) in [
        ("b-x", "B", "x"),
        ("a-y-1", "A", "y"),
        ("a-x", "A", "x"),
        ("a-y-2", "A", "y"),
    ] {
        queue
            .insert(
                Probe::new(name, RenderType::Opaque, &log)
                    .with_effect(effect, technique)
                    .into_ref(),
            )
            .unwrap();
    }

    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    let frame = FrameUniforms::default();
    assert_eq!(render(&mut queue, &mut effects, &frame).unwrap(), 4);
    assert_eq!(*log.borrow(), vec!["a-x", "a-y-1", "a-y-2", "b-x"]);
}

#[test]
fn test_transparent_bucket_is_drawn_back_to_front() {
    let log = DrawLog::default();
    let mut queue = RenderQueue::new();
    for (name, z) in [("mid", 0.0), ("near", 5.0), ("far", -5.0)] {
        queue
            .insert(
                Probe::new(name, RenderType::Transparent, &log)
                    .at(Vec3::new(0.0, 0.0, z))
                    .into_ref(),
            )
            .unwrap();
    }

    let mut camera =
        Camera::default().looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
    camera.set_perspective(600, 600, 0.1, 100.0);
    let mut frame = FrameUniforms::default();
    frame.set_camera(&camera);
    queue.sort(&frame);
    let depths: Vec<f32> = queue
        .bucket(RenderType::Transparent)
        .iter()
        .map(|r| r.borrow().position().z)
        .collect();
    assert_eq!(depths, vec![-5.0, 0.0, 5.0]);

    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    render(&mut queue, &mut effects, &frame).unwrap();
    assert_eq!(*log.borrow(), vec!["far", "mid", "near"]);
}

#[test]
fn test_buckets_are_drawn_in_order_with_lens_flares_last() {
    let log = DrawLog::default();
    let mut queue = RenderQueue::new();
    queue
        .insert_lens_flare(Probe::new("flare", RenderType::Opaque, &log).into_ref());
    for (name, render_type) in [
        ("ui", RenderType::Ui),
        ("screen", RenderType::Screen),
        ("transparent", RenderType::Transparent),
        ("opaque", RenderType::Opaque),
    ] {
        queue
            .insert(Probe::new(name, render_type, &log).into_ref())
            .unwrap();
    }
    assert_eq!(queue.len(), 5);

    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    let frame = FrameUniforms::default();
    assert_eq!(render(&mut queue, &mut effects, &frame).unwrap(), 5);
    assert_eq!(
        *log.borrow(),
        vec!["opaque", "transparent", "screen", "ui", "flare"]
    );
}

#[test]
fn test_failing_renderable_stops_dispatch() {
    let log = DrawLog::default();
    let mut queue = RenderQueue::new();
    queue
        .insert(Probe::new("first", RenderType::Opaque, &log).into_ref())
        .unwrap();
    queue
        .insert(Probe::new("broken", RenderType::Transparent, &log).failing().into_ref())
        .unwrap();
    queue
        .insert(Probe::new("never", RenderType::Ui, &log).into_ref())
        .unwrap();

    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    let frame = FrameUniforms::default();
    let err = render(&mut queue, &mut effects, &frame).unwrap_err();
    assert!(matches!(err, RenderError::NoMaterial));
    assert_eq!(*log.borrow(), vec!["first"]);
}

#[test]
fn test_frame_uniforms_are_written_once_per_render() {
    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    let mut queue = RenderQueue::new();
    let mut frame = FrameUniforms::default();

    device.reset_stats();
    assert_eq!(render(&mut queue, &mut effects, &frame).unwrap(), 0);
    // Camera, ambient light and one disabled flag per light slot.
    assert_eq!(device.stats().parameter_writes, 12);

    frame
        .set_directional_light(0, DirectionalLight::new(-Vec3::Y, LinearRgba::WHITE))
        .unwrap();
    device.reset_stats();
    render(&mut queue, &mut effects, &frame).unwrap();
    assert_eq!(device.stats().parameter_writes, 14);
}

#[test]
fn test_polygon_set_is_drawn_once_when_queued_twice() {
    let device = Arc::new(HeadlessDevice::new());
    let mut effects = effect_manager(&device);
    effects
        .create_effect(
            "flat",
            EffectDefinition {
                parameters: vec![
                    ParameterDefinition::new("world", ParameterKind::Matrix),
                    ParameterDefinition::new("worldInverseTranspose", ParameterKind::Matrix),
                ],
                techniques: vec![TechniqueDefinition {
                    name: "Main".to_string(),
                    passes: vec![PassDefinition {
                        name: "P0".to_string(),
                        inputs: vec![SignatureParameter::new("POSITION", 0)],
                    }],
                }],
            },
        )
        .unwrap();

    let layouts = Arc::new(InputLayoutCache::new(device.clone()));
    let mut set = PolygonSet::new(layouts);
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let indices = [0u32, 1, 2];
    set.set_buffers(
        vec![
            Arc::new(GeometryBuffer::from_positions(device.clone(), &positions).unwrap()),
            Arc::new(GeometryBuffer::from_indices(device.clone(), &indices).unwrap()),
        ],
        PrimitiveTopology::TriangleList,
    )
    .unwrap();
    set.set_effect_name(&effects, "flat", "Main").unwrap();

    let set: RenderableRef = Rc::new(RefCell::new(set));
    let mut queue = RenderQueue::new();
    queue.insert(set.clone()).unwrap();
    queue.insert(set).unwrap();

    let frame = FrameUniforms::default();
    assert_eq!(render(&mut queue, &mut effects, &frame).unwrap(), 1);
    assert_eq!(device.stats().indexed_draws, 1);
}
