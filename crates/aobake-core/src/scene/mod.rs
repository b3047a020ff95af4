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

//! Read-only view of the scene the baker draws occluders from.
//!
//! The baker never owns scene objects. It enumerates [`RenderSource`]s through
//! a [`SceneQuery`] when building batches, and looks them up again by
//! [`SourceId`] to read their live world bounds while culling.

use crate::math::{Aabb, Mat4, Vec3};
use std::sync::Arc;

/// Render queue of ordinary opaque geometry.
pub const RENDER_QUEUE_GEOMETRY: u32 = 2000;
/// First render queue of alpha-tested geometry. Sources at or above it are not
/// used as occluders.
pub const RENDER_QUEUE_ALPHA_TEST: u32 = 2450;

/// A stable identifier of a render source within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// The kind of renderer a source is drawn by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A static or dynamic mesh renderer.
    Mesh,
    /// A skinned mesh renderer. Its mesh is taken in bind pose.
    Skinned,
}

/// Local-space triangle geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in local space.
    pub positions: Vec<Vec3>,
    /// Triangle index lists, one per sub-mesh.
    pub submeshes: Vec<Vec<u32>>,
}

impl Mesh {
    /// Creates a mesh from positions and per-sub-mesh index lists.
    pub fn new(positions: Vec<Vec3>, submeshes: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            submeshes,
        }
    }

    /// Total number of whole triangles over all sub-meshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Bounds of all positions, `None` for an empty mesh.
    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

/// One renderer in the scene.
#[derive(Debug, Clone)]
pub struct RenderSource {
    /// Identifier used to look the source up again.
    pub id: SourceId,
    /// Human readable name, used in logs.
    pub name: String,
    /// Mesh or skinned renderer.
    pub kind: SourceKind,
    /// Local-to-world transform at the time of the query.
    pub local_to_world: Mat4,
    /// The shared mesh, if the renderer has one.
    pub mesh: Option<Arc<Mesh>>,
    /// Render queue of the first material, if the renderer has a material.
    pub render_queue: Option<u32>,
    /// Whether the object is flagged static.
    pub is_static: bool,
    /// Current world-space bounds.
    pub bounds: Aabb,
}

impl RenderSource {
    /// Creates a static mesh renderer in the geometry queue, with world bounds
    /// derived from the mesh and transform.
    pub fn new(
        id: SourceId,
        name: impl Into<String>,
        mesh: Arc<Mesh>,
        local_to_world: Mat4,
    ) -> Self {
        let bounds = mesh
            .local_bounds()
            .map(|b| b.transform(&local_to_world))
            .unwrap_or_default();
        Self {
            id,
            name: name.into(),
            kind: SourceKind::Mesh,
            local_to_world,
            mesh: Some(mesh),
            render_queue: Some(RENDER_QUEUE_GEOMETRY),
            is_static: true,
            bounds,
        }
    }

    /// Returns `true` when the material renders in the alpha-test queue or later.
    pub fn is_alpha_tested(&self) -> bool {
        self.render_queue
            .is_some_and(|queue| queue >= RENDER_QUEUE_ALPHA_TEST)
    }
}

/// Read access to the scene.
pub trait SceneQuery {
    /// Enumerates every render source, in scene order.
    fn sources(&self) -> Box<dyn Iterator<Item = &RenderSource> + '_>;

    /// Looks up a render source by id.
    fn source(&self, id: SourceId) -> Option<&RenderSource> {
        self.sources().find(|s| s.id == id)
    }
}

/// The object whose UV layout receives the occlusion map.
#[derive(Debug, Clone)]
pub struct BakeTarget {
    /// The scene source the target was taken from.
    pub source: SourceId,
    /// The mesh rasterized in UV space.
    pub mesh: Arc<Mesh>,
    /// Local-to-world transform of the target.
    pub local_to_world: Mat4,
    /// World-space bounds of the target, used for culling occluders.
    pub bounds: Aabb,
}

impl BakeTarget {
    /// Builds a target from a render source. Returns `None` when the source has
    /// no mesh.
    pub fn from_source(source: &RenderSource) -> Option<Self> {
        let mesh = source.mesh.clone()?;
        Some(Self {
            source: source.id,
            mesh,
            local_to_world: source.local_to_world,
            bounds: source.bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Arc<Mesh> {
        Arc::new(Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 0, 2, 3]],
        ))
    }

    #[test]
    fn test_render_source_bounds_follow_transform() {
        let source = RenderSource::new(
            SourceId(1),
            "quad",
            quad(),
            Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
        );
        assert_eq!(source.bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(source.bounds.max, Vec3::new(11.0, 1.0, 0.0));
    }

    #[test]
    fn test_alpha_test_threshold() {
        let mut source = RenderSource::new(SourceId(1), "quad", quad(), Mat4::IDENTITY);
        assert!(!source.is_alpha_tested());
        source.render_queue = Some(2449);
        assert!(!source.is_alpha_tested());
        source.render_queue = Some(RENDER_QUEUE_ALPHA_TEST);
        assert!(source.is_alpha_tested());
        source.render_queue = None;
        assert!(!source.is_alpha_tested());
    }

    #[test]
    fn test_triangle_count_and_target() {
        let source = RenderSource::new(SourceId(4), "quad", quad(), Mat4::IDENTITY);
        assert_eq!(source.mesh.as_ref().map(|m| m.triangle_count()), Some(2));
        let target = BakeTarget::from_source(&source).expect("source has a mesh");
        assert_eq!(target.source, SourceId(4));

        let mut empty = source.clone();
        empty.mesh = None;
        assert!(BakeTarget::from_source(&empty).is_none());
    }
}
