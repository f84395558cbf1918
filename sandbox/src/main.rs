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

// EngineX sandbox
// Renders a few frames of a small scene on the headless device and reports
// what reached the device.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use enginex_core::math::{LinearRgba, Vec3};
use enginex_core::renderer::{DirectionalLight, ShaderProgramSource};
use enginex_infra::config::load_settings;
use enginex_infra::{HeadlessDevice, InMemoryTextureRegistry};
use enginex_render::geometry::{generate_quad, generate_sphere, MaterialChannel};
use enginex_render::{
    Camera, EffectManager, FrameUniforms, InputLayoutCache, PolygonSet, RenderContext,
    RenderQueue, RenderType,
};

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let settings = load_settings(root.join("assets/settings.ron"))?;
    let effect_directory = root.join(&settings.effect_directory);

    let device = Arc::new(HeadlessDevice::new());
    let textures = Arc::new(InMemoryTextureRegistry::new());
    textures.register("checker");

    let mut effects = EffectManager::new(
        device.clone(),
        textures.clone(),
        ShaderProgramSource::File(effect_directory.join(&settings.shared_effect)),
    )?
    .with_effect_directory(&effect_directory);
    effects.set_directional_light_limit(settings.directional_light_limit());
    effects.create_effect_from_file("standard", "standard.ron")?;

    let layouts = Arc::new(InputLayoutCache::new(device.clone()));

    let mut floor_mesh = generate_quad(10.0, 10.0);
    floor_mesh.material.diffuse = MaterialChannel::Texture("checker".to_string());
    let floor = Rc::new(RefCell::new(PolygonSet::from_mesh(
        layouts.clone(),
        &effects,
        &floor_mesh,
        "standard",
        "Lit",
    )?));
    floor
        .borrow_mut()
        .transform_mut()
        .rotate_axis_angle(Vec3::X, -std::f32::consts::FRAC_PI_2);

    let ball_mesh = generate_sphere(1.0, 24, false)?;
    let ball = Rc::new(RefCell::new(PolygonSet::from_mesh(
        layouts.clone(),
        &effects,
        &ball_mesh,
        "standard",
        "Lit",
    )?));
    ball.borrow_mut()
        .transform_mut()
        .translate(Vec3::new(0.0, 1.0, 0.0));

    let mut glass =
        PolygonSet::from_mesh(layouts.clone(), &effects, &ball_mesh, "standard", "Unlit")?
            .with_render_type(RenderType::Transparent);
    if let Some(material) = glass.material_mut() {
        material.set_float("opacity", 0.4)?;
        material.set_float4("diffuseColor", LinearRgba::new(0.6, 0.8, 1.0, 1.0))?;
    }
    glass.transform_mut().translate(Vec3::new(2.0, 1.0, -1.0));
    let glass = Rc::new(RefCell::new(glass));

    let mut queue = RenderQueue::new();
    queue.insert(floor.clone())?;
    queue.insert(ball.clone())?;
    queue.insert(glass.clone())?;

    let mut camera = Camera::default().looking_at(Vec3::new(0.0, 3.0, 8.0), Vec3::ZERO, Vec3::Y);
    camera.set_perspective(settings.viewport_width, settings.viewport_height, 0.1, 100.0);

    let mut frame = FrameUniforms::default();
    frame.set_directional_light(
        0,
        DirectionalLight::new(Vec3::new(-0.5, -1.0, -0.3), LinearRgba::WHITE),
    )?;

    log::info!(
        "Rendering {} frames, clear color {:?}",
        settings.frame_count,
        settings.clear_color
    );
    for index in 0..settings.frame_count {
        ball.borrow_mut().transform_mut().rotate_axis_angle(Vec3::Y, 0.25);
        // Dolly towards the scene.
        camera.transform.translate_local(Vec3::new(0.0, 0.0, -0.5));
        frame.set_camera(&camera);

        let mut ctx = RenderContext::new(&mut effects, &frame);
        let drawn = queue.render(&mut ctx)?;
        log::info!("Frame {index}: {drawn} renderables drawn");
    }

    let stats = device.stats();
    log::info!(
        "Device stats: {} draws, {} indexed draws, {} parameter writes, {} input layouts, {} bytes uploaded",
        stats.draws,
        stats.indexed_draws,
        stats.parameter_writes,
        stats.input_layouts_created,
        stats.bytes_uploaded
    );
    Ok(())
}
