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

//! Geometry batching.
//!
//! Turns the scene's render sources into [`BakeBatch`]es: one per qualifying
//! source, each split into [`VertexGroup`]s small enough for a single
//! occlusion draw. Vertices stay in local space; the transform travels with
//! the batch.

mod vertex_group;

pub use self::vertex_group::{VertexGroup, VERTEX_GROUP_CAPACITY};

use aobake_core::math::{Aabb, Mat4, Vec3, Vec4};
use aobake_core::scene::{Mesh, RenderSource, SceneQuery, SourceId, SourceKind};
use aobake_core::BakeError;

/// The occluder geometry of one render source.
#[derive(Debug, Clone)]
pub struct BakeBatch {
    /// The source the geometry was taken from.
    pub source: SourceId,
    /// The source's name, for logs.
    pub name: String,
    /// Local-to-world transform captured when the batch was built.
    pub local_to_world: Mat4,
    /// Bounds of the mesh in local space.
    pub local_bounds: Aabb,
    /// The triangles, split into draw-sized groups.
    pub vertex_groups: Vec<VertexGroup>,
}

impl BakeBatch {
    /// Builds the batch of a render source. Returns `None` when the source has
    /// no mesh.
    pub fn from_source(source: &RenderSource) -> Option<Self> {
        let mesh = source.mesh.as_deref()?;
        match Self::from_mesh(source.id, &source.name, mesh, source.local_to_world) {
            Ok(batch) => Some(batch),
            Err(e) => {
                log::warn!("Skipping '{}': {}", source.name, e);
                None
            }
        }
    }

    /// Splits a mesh into vertex groups.
    ///
    /// Triangles referencing a vertex outside the position array are skipped.
    pub fn from_mesh(
        source: SourceId,
        name: &str,
        mesh: &Mesh,
        local_to_world: Mat4,
    ) -> Result<Self, BakeError> {
        let mut vertex_groups = Vec::new();
        let mut group = VertexGroup::new();
        let mut skipped = 0usize;

        for indices in &mesh.submeshes {
            for triangle in indices.chunks_exact(3) {
                let Some(vertices) = triangle_vertices(&mesh.positions, triangle) else {
                    skipped += 1;
                    continue;
                };

                group.push_triangle(vertices)?;
                if group.is_full() {
                    vertex_groups.push(std::mem::replace(&mut group, VertexGroup::new()));
                }
            }
        }
        if !group.is_empty() {
            vertex_groups.push(group);
        }

        if skipped > 0 {
            log::warn!(
                "'{}': skipped {} triangle(s) with out-of-range indices",
                name,
                skipped
            );
        }

        Ok(Self {
            source,
            name: name.to_owned(),
            local_to_world,
            local_bounds: mesh.local_bounds().unwrap_or_default(),
            vertex_groups,
        })
    }

    /// Total number of vertices over all groups.
    pub fn vertex_count(&self) -> usize {
        self.vertex_groups.iter().map(VertexGroup::len).sum()
    }

    /// World-space bounds of the batch.
    ///
    /// Read live from the scene when the source can still be found there, so
    /// objects moved after collection cull correctly. Otherwise the local
    /// bounds are transformed by the captured transform.
    pub fn world_bounds(&self, scene: Option<&dyn SceneQuery>) -> Aabb {
        scene
            .and_then(|scene| scene.source(self.source))
            .map(|source| source.bounds)
            .unwrap_or_else(|| self.local_bounds.transform(&self.local_to_world))
    }
}

/// Looks up the three corners of a triangle as homogeneous points.
fn triangle_vertices(positions: &[Vec3], triangle: &[u32]) -> Option<[Vec4; 3]> {
    let corner = |i: u32| positions.get(i as usize).copied().map(Vec4::point);
    Some([
        corner(triangle[0])?,
        corner(triangle[1])?,
        corner(triangle[2])?,
    ])
}

/// Collects the occluder batches of a scene.
///
/// Mesh renderers come first, then skinned renderers unless `ignore_skinned`,
/// each in scene order. Non-static sources are rejected when `static_only`,
/// and alpha-tested sources always are. Sources without geometry are skipped.
pub fn collect_batches(
    scene: &dyn SceneQuery,
    static_only: bool,
    ignore_skinned: bool,
) -> Vec<BakeBatch> {
    let mut kinds = vec![SourceKind::Mesh];
    if !ignore_skinned {
        kinds.push(SourceKind::Skinned);
    }

    let mut batches = Vec::new();
    for kind in kinds {
        for source in scene.sources().filter(|s| s.kind == kind) {
            if static_only && !source.is_static {
                continue;
            }
            if source.is_alpha_tested() {
                log::debug!("'{}' is alpha tested, not an occluder", source.name);
                continue;
            }
            let Some(batch) = BakeBatch::from_source(source) else {
                log::debug!("'{}' has no usable mesh", source.name);
                continue;
            };
            if batch.vertex_groups.is_empty() {
                log::debug!("'{}' has no triangles", source.name);
                continue;
            }
            batches.push(batch);
        }
    }

    log::debug!("Collected {} bake batch(es)", batches.len());
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use aobake_core::scene::RENDER_QUEUE_ALPHA_TEST;
    use std::sync::Arc;

    struct ListScene(Vec<RenderSource>);

    impl SceneQuery for ListScene {
        fn sources(&self) -> Box<dyn Iterator<Item = &RenderSource> + '_> {
            Box::new(self.0.iter())
        }
    }

    fn strip(triangles: usize) -> Mesh {
        let positions = (0..triangles * 3)
            .map(|i| Vec3::new(i as f32, (i % 3) as f32, 0.0))
            .collect();
        let indices = (0..triangles as u32 * 3).collect();
        Mesh::new(positions, vec![indices])
    }

    fn source(id: u32, name: &str, triangles: usize) -> RenderSource {
        let mesh = Arc::new(strip(triangles));
        RenderSource::new(SourceId(id), name, mesh, Mat4::IDENTITY)
    }

    fn names(batches: Vec<BakeBatch>) -> Vec<String> {
        batches.into_iter().map(|b| b.name).collect()
    }

    #[test]
    fn test_three_thousand_triangles_make_ten_groups() {
        let batch = BakeBatch::from_source(&source(1, "big", 3000)).unwrap();
        let sizes: Vec<usize> = batch.vertex_groups.iter().map(VertexGroup::len).collect();
        assert_eq!(sizes.len(), 10);
        assert!(sizes[..9].iter().all(|&n| n == 999));
        assert_eq!(sizes[9], 9);
        assert_eq!(batch.vertex_count(), 9000);
    }

    #[test]
    fn test_exact_multiple_leaves_no_empty_group() {
        let batch = BakeBatch::from_source(&source(1, "exact", 333)).unwrap();
        assert_eq!(batch.vertex_groups.len(), 1);
        assert_eq!(batch.vertex_groups[0].len(), 999);
    }

    #[test]
    fn test_vertices_are_homogeneous_points() {
        let batch = BakeBatch::from_source(&source(1, "one", 1)).unwrap();
        let v = batch.vertex_groups[0].vertices();
        assert_eq!(v[1], Vec4::new(1.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_out_of_range_triangles_are_skipped() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::ONE, Vec3::new(1.0, 0.0, 0.0)],
            vec![vec![0, 1, 2, 0, 1, 7], vec![2, 1, 0]],
        );
        let batch = BakeBatch::from_mesh(SourceId(1), "bad", &mesh, Mat4::IDENTITY).unwrap();
        assert_eq!(batch.vertex_count(), 6);
    }

    #[test]
    fn test_collect_order_and_filters() {
        let mut skinned = source(1, "skinned", 2);
        skinned.kind = SourceKind::Skinned;
        let mut dynamic = source(2, "dynamic", 2);
        dynamic.is_static = false;
        let mut cutout = source(3, "cutout", 2);
        cutout.render_queue = Some(RENDER_QUEUE_ALPHA_TEST);
        let mut no_mesh = source(4, "empty", 2);
        no_mesh.mesh = None;
        let plain = source(5, "plain", 2);

        let scene = ListScene(vec![skinned, dynamic, cutout, no_mesh, plain]);

        let statics = names(collect_batches(&scene, true, false));
        assert_eq!(statics, ["plain", "skinned"]);
        let rigid = names(collect_batches(&scene, true, true));
        assert_eq!(rigid, ["plain"]);
        let all = names(collect_batches(&scene, false, false));
        assert_eq!(all, ["dynamic", "plain", "skinned"]);
    }

    #[test]
    fn test_world_bounds_prefer_the_live_scene() {
        let mut moved = source(1, "moved", 1);
        let batch = BakeBatch::from_source(&moved).unwrap();
        moved.bounds = Aabb::from_min_max(Vec3::splat(50.0), Vec3::splat(51.0));
        let scene = ListScene(vec![moved]);

        let live = batch.world_bounds(Some(&scene as &dyn SceneQuery));
        assert_eq!(live.min, Vec3::splat(50.0));
        assert_eq!(batch.world_bounds(None).min, Vec3::ZERO);
    }
}
