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

//! Techniques and their passes.

use enginex_core::renderer::{
    GraphicsDevice, PassId, ReflectedTechnique, ResourceError, SignatureParameter,
};

/// One shader-stage invocation unit with a fixed vertex-input signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    id: PassId,
    name: String,
    input_signature: Vec<SignatureParameter>,
}

impl Pass {
    /// Creates a pass.
    pub fn new(id: PassId, name: impl Into<String>, input_signature: Vec<SignatureParameter>) -> Self {
        Self {
            id,
            name: name.into(),
            input_signature,
        }
    }

    /// The device handle of the pass.
    pub fn id(&self) -> PassId {
        self.id
    }

    /// The pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered `(semantic, index)` inputs the vertex stage expects.
    pub fn input_signature(&self) -> &[SignatureParameter] {
        &self.input_signature
    }

    /// Commits the pass pipeline state, including pending parameter writes.
    pub fn apply(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.apply_pass(self.id)
    }
}

/// A named rendering strategy: an ordered sequence of passes.
///
/// Immutable once created; shared with polygon sets through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    name: String,
    effect_name: String,
    passes: Vec<Pass>,
}

impl Technique {
    /// Builds a technique from the device's reflection data.
    pub fn from_reflection(effect_name: &str, reflected: ReflectedTechnique) -> Self {
        Self {
            name: reflected.name,
            effect_name: effect_name.to_string(),
            passes: reflected
                .passes
                .into_iter()
                .map(|p| Pass::new(p.id, p.name, p.input_signature))
                .collect(),
        }
    }

    /// The technique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effect this technique belongs to.
    pub fn effect_name(&self) -> &str {
        &self.effect_name
    }

    /// The passes, in execution order.
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }
}
