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

//! Memoizes device input layouts by their element descriptions.

use enginex_core::renderer::{GraphicsDevice, InputElementDescription, InputLayoutId, ResourceError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::effects::Pass;

/// A cache of input layouts keyed by the exact ordered element list.
///
/// Entries live as long as the cache; there is no eviction. The first pass a
/// description list is seen with is the one the layout is created against.
#[derive(Debug)]
pub struct InputLayoutCache {
    device: Arc<dyn GraphicsDevice>,
    layouts: Mutex<BTreeMap<Vec<InputElementDescription>, InputLayoutId>>,
}

impl InputLayoutCache {
    /// Creates an empty cache creating layouts on `device`.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            layouts: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Vec<InputElementDescription>, InputLayoutId>> {
        self.layouts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the layout for `elements`, creating it against `pass` on a miss.
    pub fn get_or_create(
        &self,
        elements: &[InputElementDescription],
        pass: &Pass,
    ) -> Result<InputLayoutId, ResourceError> {
        let mut layouts = self.lock();
        if let Some(id) = layouts.get(elements) {
            return Ok(*id);
        }

        let id = self.device.create_input_layout(elements, pass.id())?;
        log::debug!(
            "InputLayoutCache: created {:?} with {} elements for pass '{}'",
            id,
            elements.len(),
            pass.name()
        );
        layouts.insert(elements.to_vec(), id);
        Ok(id)
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no layout has been created yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
