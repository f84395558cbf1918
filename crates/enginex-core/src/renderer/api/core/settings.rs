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

//! Global settings for the rendering system.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::math::LinearRgba;
use crate::renderer::light::MAX_DIRECTIONAL_LIGHTS;

/// A collection of global settings that affect how effects are loaded and
/// frames are driven. Missing fields in a settings file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Directory effect files are resolved against.
    pub effect_directory: PathBuf,
    /// File name of the effect providing the shared parameter pool.
    pub shared_effect: String,
    /// Color the back buffer is cleared to each frame.
    pub clear_color: LinearRgba,
    /// How many directional lights the frame uniforms carry.
    pub max_directional_lights: usize,
    /// Number of frames the sandbox renders before exiting.
    pub frame_count: u32,
    /// Width of the client area in pixels.
    pub viewport_width: u32,
    /// Height of the client area in pixels.
    pub viewport_height: u32,
}

impl RenderSettings {
    /// The directional light count, clamped to what the shared pool supports.
    pub fn directional_light_limit(&self) -> usize {
        if self.max_directional_lights > MAX_DIRECTIONAL_LIGHTS {
            log::warn!(
                "RenderSettings: max_directional_lights = {} exceeds the supported {}, clamping",
                self.max_directional_lights,
                MAX_DIRECTIONAL_LIGHTS
            );
        }
        self.max_directional_lights.min(MAX_DIRECTIONAL_LIGHTS)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            effect_directory: PathBuf::from("assets/effects"),
            shared_effect: "shared.ron".to_string(),
            clear_color: LinearRgba::rgb(0.0, 0.0, 0.1),
            max_directional_lights: MAX_DIRECTIONAL_LIGHTS,
            frame_count: 3,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let settings: RenderSettings = ron::from_str("(frame_count: 10)").unwrap();
        assert_eq!(settings.frame_count, 10);
        assert_eq!(settings.shared_effect, "shared.ron");
        assert_eq!((settings.viewport_width, settings.viewport_height), (1280, 720));
    }

    #[test]
    fn test_directional_light_limit_is_clamped() {
        let settings = RenderSettings {
            max_directional_lights: 32,
            ..Default::default()
        };
        assert_eq!(settings.directional_light_limit(), MAX_DIRECTIONAL_LIGHTS);
    }
}
