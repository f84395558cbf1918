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

//! Loads effect definitions from RON files.

use anyhow::{Context, Result};
use enginex_core::renderer::EffectDefinition;
use std::path::Path;

/// Parses an effect definition from RON text.
pub fn parse_effect_definition(source: &str) -> Result<EffectDefinition> {
    ron::from_str(source).context("Failed to parse effect definition")
}

/// Reads and parses the effect definition at `path`.
pub fn load_effect_definition(path: impl AsRef<Path>) -> Result<EffectDefinition> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read effect file {}", path.display()))?;
    let definition = parse_effect_definition(&source)
        .with_context(|| format!("Invalid effect file {}", path.display()))?;
    log::debug!(
        "Loaded effect definition {} ({} parameters, {} techniques)",
        path.display(),
        definition.parameters.len(),
        definition.techniques.len()
    );
    Ok(definition)
}
