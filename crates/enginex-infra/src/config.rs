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

//! Loads [`RenderSettings`] from RON files.

use anyhow::{Context, Result};
use enginex_core::renderer::RenderSettings;
use std::path::Path;

/// Reads the settings at `path`.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_settings(path: impl AsRef<Path>) -> Result<RenderSettings> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!(
            "No settings file at {}, using default settings",
            path.display()
        );
        return Ok(RenderSettings::default());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings: RenderSettings = ron::from_str(&source)
        .with_context(|| format!("Invalid settings file {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}
