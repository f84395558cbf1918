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

//! Integration tests for the RON settings and effect loaders.

use enginex_core::renderer::{GraphicsDevice, ShaderProgramDescriptor, ShaderProgramSource};
use enginex_infra::config::load_settings;
use enginex_infra::effects::load_effect_definition;
use enginex_infra::HeadlessDevice;
use std::fs;

const EFFECT: &str = r#"(
    parameters: [
        (name: "world", kind: Matrix),
        (name: "worldInverseTranspose", kind: Matrix),
        (name: "tint", kind: Float4, default: Some(Float4((x: 1.0, y: 0.5, z: 0.5, w: 1.0)))),
    ],
    techniques: [
        (name: "Unlit", passes: [(name: "P0", inputs: [(semantic_name: "POSITION")])]),
    ],
)"#;

#[test]
fn test_missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_settings(dir.path().join("missing.ron")).unwrap();
    assert_eq!(settings, Default::default());
}

#[test]
fn test_settings_file_overrides_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");
    fs::write(&path, "(frame_count: 7, shared_effect: \"pool.ron\")").unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.frame_count, 7);
    assert_eq!(settings.shared_effect, "pool.ron");
}

#[test]
fn test_malformed_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");
    fs::write(&path, "(frame_count: \"many\")").unwrap();

    let err = load_settings(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid settings file"));
}

#[test]
fn test_effect_file_compiles_on_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unlit.ron");
    fs::write(&path, EFFECT).unwrap();

    let definition = load_effect_definition(&path).unwrap();
    assert_eq!(definition.parameters.len(), 3);

    let device = HeadlessDevice::new();
    let reflection = device
        .create_shader_program(&ShaderProgramDescriptor {
            label: Some("unlit".into()),
            source: ShaderProgramSource::File(path),
        })
        .unwrap();
    assert_eq!(reflection.techniques[0].name, "Unlit");
}

#[test]
fn test_missing_effect_file_reports_path() {
    let device = HeadlessDevice::new();
    let err = device
        .create_shader_program(&ShaderProgramDescriptor {
            label: None,
            source: ShaderProgramSource::File("does/not/exist.ron".into()),
        })
        .unwrap_err();
    assert!(err.to_string().contains("does/not/exist.ron"));
}
