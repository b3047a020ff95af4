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

use aobake_core::math::Mat4;
use aobake_core::scene::{Mesh, RenderSource, SceneQuery, SourceId};
use std::sync::Arc;

/// A scene held as a plain list of render sources, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    sources: Vec<RenderSource>,
    next_id: u32,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a static mesh renderer and returns its id.
    pub fn add_mesh(&mut self, name: &str, mesh: Arc<Mesh>, local_to_world: Mat4) -> SourceId {
        let id = self.allocate_id();
        let source = RenderSource::new(id, name, mesh, local_to_world);
        self.sources.push(source);
        id
    }

    /// Adds a fully described source. Its id is replaced by a fresh one, which
    /// is returned.
    pub fn insert(&mut self, mut source: RenderSource) -> SourceId {
        source.id = self.allocate_id();
        let id = source.id;
        self.sources.push(source);
        id
    }

    /// Mutable access to a source, e.g. to flag it dynamic or change its queue.
    pub fn get_mut(&mut self, id: SourceId) -> Option<&mut RenderSource> {
        self.sources.iter_mut().find(|s| s.id == id)
    }

    /// Moves a source. Its world bounds follow the new transform.
    ///
    /// Returns `false` when no source has this id.
    pub fn set_transform(&mut self, id: SourceId, local_to_world: Mat4) -> bool {
        let Some(source) = self.get_mut(id) else {
            return false;
        };
        source.local_to_world = local_to_world;
        if let Some(bounds) = source.mesh.as_ref().and_then(|m| m.local_bounds()) {
            source.bounds = bounds.transform(&local_to_world);
        }
        true
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the scene holds no source.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn allocate_id(&mut self) -> SourceId {
        self.next_id += 1;
        SourceId(self.next_id)
    }
}

impl SceneQuery for MemoryScene {
    fn sources(&self) -> Box<dyn Iterator<Item = &RenderSource> + '_> {
        Box::new(self.sources.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aobake_core::math::Vec3;

    fn cube() -> Arc<Mesh> {
        Arc::new(Mesh::new(
            vec![
                Vec3::splat(-1.0),
                Vec3::splat(1.0),
                Vec3::new(1.0, -1.0, 1.0),
            ],
            vec![vec![0, 1, 2]],
        ))
    }

    #[test]
    fn test_ids_are_unique_and_lookup_works() {
        let mut scene = MemoryScene::new();
        let a = scene.add_mesh("a", cube(), Mat4::IDENTITY);
        let b = scene.add_mesh("b", cube(), Mat4::IDENTITY);
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.source(b).map(|s| s.name.as_str()), Some("b"));
        assert!(scene.source(SourceId(99)).is_none());
    }

    #[test]
    fn test_set_transform_moves_bounds() {
        let mut scene = MemoryScene::new();
        let id = scene.add_mesh("a", cube(), Mat4::IDENTITY);
        let shifted = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!(scene.set_transform(id, shifted));
        let bounds = scene.source(id).unwrap().bounds;
        assert_eq!(bounds.min, Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(6.0, 1.0, 1.0));
        assert!(!scene.set_transform(SourceId(42), Mat4::IDENTITY));
    }
}
