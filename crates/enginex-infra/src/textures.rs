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

//! An in-memory texture registry.

use enginex_core::renderer::{TextureId, TextureRegistry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

/// Resolves texture names to handles registered at load time.
#[derive(Debug, Default)]
pub struct InMemoryTextureRegistry {
    textures: RwLock<HashMap<String, TextureId>>,
    next_id: AtomicUsize,
}

impl InMemoryTextureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, TextureId>> {
        self.textures
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers `name`, returning its handle. Registering a name twice
    /// returns the existing handle.
    pub fn register(&self, name: impl Into<String>) -> TextureId {
        let mut textures = self
            .textures
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let name = name.into();
        *textures.entry(name).or_insert_with_key(|name| {
            let id = TextureId(self.next_id.fetch_add(1, Ordering::Relaxed));
            log::debug!("InMemoryTextureRegistry: registered '{name}' as {id:?}");
            id
        })
    }

    /// Removes `name`, returning its handle if it was registered.
    pub fn unregister(&self, name: &str) -> Option<TextureId> {
        self.textures
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name)
    }

    /// Number of registered textures.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl TextureRegistry for InMemoryTextureRegistry {
    fn resolve(&self, name: &str) -> Option<TextureId> {
        self.read().get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let registry = InMemoryTextureRegistry::new();
        let stars = registry.register("stars");
        assert_eq!(registry.register("stars"), stars);
        assert_ne!(registry.register("clouds"), stars);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_and_unregister() {
        let registry = InMemoryTextureRegistry::new();
        let id = registry.register("stars");
        assert_eq!(registry.resolve("stars"), Some(id));
        assert!(registry.contains("stars"));
        assert_eq!(registry.unregister("stars"), Some(id));
        assert_eq!(registry.resolve("stars"), None);
    }
}
