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

use crate::math::{Mat4, Vec2, Vec4};
use crate::renderer::{SurfaceDevice, SurfaceId};
use crate::scene::BakeTarget;
use crate::BakeError;

/// Inputs of one occlusion draw: one vertex group of one batch, traced from
/// every texel of the bake target for one sample triple.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionDraw<'a> {
    /// The object whose UV layout is being baked. The kernel rasterizes its
    /// mesh in UV space.
    pub target: &'a BakeTarget,
    /// Occluder triangles, local space, homogeneous, three vertices per triangle.
    pub vertices: &'a [Vec4],
    /// Local-to-world transform of the occluder batch.
    pub local_to_world: Mat4,
    /// The slice content accumulated so far for this sample, if any.
    ///
    /// The kernel samples it as a texture and must never write to it.
    pub previous: Option<SurfaceId>,
    /// The sample triple for this draw, each point in `[0, 1)²`.
    pub samples: [Vec2; 3],
    /// Effective radius of the occlusion trace.
    pub trace_radius: f32,
    /// Whether back-facing occluder triangles are ignored.
    pub cull_back: bool,
}

impl OcclusionDraw<'_> {
    /// Number of vertices in the group (always a multiple of three).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// The opaque rasterization kernel that estimates per-texel occlusion.
///
/// Implementations clear `output`, then write `previous + occlusion(draw)` into
/// it, with ADD-like semantics so successive vertex groups of one sample
/// accumulate onto the same slice.
pub trait OcclusionKernel: Send + Sync {
    /// Records and executes one occlusion draw into `output`.
    fn draw(
        &self,
        device: &mut dyn SurfaceDevice,
        output: SurfaceId,
        draw: &OcclusionDraw<'_>,
    ) -> Result<(), BakeError>;
}

/// The kernel pair that merges sample slices into the running accumulator and
/// dilates the finished map across UV borders.
pub trait BlendKernel: Send + Sync {
    /// Writes `accumulator + weight * sum(slices)` into `output`.
    ///
    /// `slices` holds between one and three surfaces. Coverage (alpha) is the
    /// union of the inputs' coverage.
    fn blend(
        &self,
        device: &mut dyn SurfaceDevice,
        accumulator: SurfaceId,
        slices: &[SurfaceId],
        weight: f32,
        output: SurfaceId,
    ) -> Result<(), BakeError>;

    /// Writes `source` into `output`, replacing each unwritten texel with its
    /// nearest written neighbour.
    fn dilate(
        &self,
        device: &mut dyn SurfaceDevice,
        source: SurfaceId,
        output: SurfaceId,
    ) -> Result<(), BakeError>;
}
