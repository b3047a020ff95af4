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

use super::request::{BakeRequest, BakeResult};
use aobake_core::renderer::{KernelRegistry, SurfaceDevice};
use aobake_core::scene::{BakeTarget, SceneQuery, SourceId};
use aobake_core::{BakeError, BakeSettings};
use aobake_lanes::{collect_batches, extract_image, BakeBatch, BakeKernels, BakeLane, Sampler};

/// Owns a surface device and a kernel registry, and runs bakes on them.
///
/// The agent is the only place that decides *whether* a bake can run: it
/// rejects requests without a target or occluders and requests whose kernels
/// are not registered, all before a single surface is acquired.
#[derive(Debug)]
pub struct BakeAgent<D: SurfaceDevice> {
    device: D,
    kernels: KernelRegistry,
}

impl<D: SurfaceDevice> BakeAgent<D> {
    /// Creates an agent over `device`, resolving kernels from `kernels`.
    pub fn new(device: D, kernels: KernelRegistry) -> Self {
        Self { device, kernels }
    }

    /// The surface device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Bakes the occlusion map of `request.target`.
    ///
    /// Batches whose world bounds miss the target's bounds are culled. If none
    /// is left, the result is the cleared (fully transparent) map. Every
    /// surface acquired during the bake is released before returning, on every
    /// path.
    pub fn bake(&mut self, request: BakeRequest<'_>) -> Result<BakeResult, BakeError> {
        let BakeRequest {
            target,
            batches,
            scene,
            settings,
            progress,
            cancel,
        } = request;

        let target = target.ok_or(BakeError::EmptyInput("no bake target"))?;
        if batches.is_empty() {
            return Err(BakeError::EmptyInput("no occluder batches"));
        }
        let kernels = BakeKernels::resolve(&self.kernels).map_err(|e| {
            log::error!("Cannot bake: {}", e);
            e
        })?;

        let settings = settings.sanitized();
        let target_bounds = scene
            .and_then(|scene| scene.source(target.source))
            .map_or(target.bounds, |source| source.bounds);
        let culled: Vec<&BakeBatch> = batches
            .iter()
            .filter(|batch| batch.world_bounds(scene).intersects_aabb(&target_bounds))
            .collect();

        log::info!(
            "Baking AO for {:?}: {} of {} batch(es) after culling, {} {} samples, {}x{} map",
            target.source,
            culled.len(),
            batches.len(),
            settings.num_samples,
            settings.sampler_type,
            settings.ao_map_size,
            settings.ao_map_size
        );

        let sampler = Sampler::from_settings(&settings);
        let lane = BakeLane::new(&mut self.device, kernels, &settings, sampler, target)?;
        let outcome = lane.run(culled, progress, cancel)?;

        let image = extract_image(&self.device, outcome.surface);
        let released = self.device.release(outcome.surface);
        let image = image?;
        released?;

        log::info!(
            "Bake {:?} after {} tick(s): {} draw(s), {} blend window(s), {} padding pass(es)",
            outcome.status,
            outcome.stats.ticks,
            outcome.stats.draw_calls,
            outcome.stats.blend_windows,
            outcome.stats.padding_passes
        );

        Ok(BakeResult {
            image,
            status: outcome.status,
            stats: outcome.stats,
        })
    }

    /// Collects the occluders of `scene` and bakes the source `target`.
    ///
    /// Fails with [`BakeError::EmptyInput`] when the target is not in the scene,
    /// has no mesh, or when no occluder qualifies.
    pub fn bake_scene(
        &mut self,
        scene: &dyn SceneQuery,
        target: SourceId,
        static_only: bool,
        ignore_skinned: bool,
        settings: &BakeSettings,
    ) -> Result<BakeResult, BakeError> {
        let target = scene.source(target).and_then(BakeTarget::from_source);
        let batches = collect_batches(scene, static_only, ignore_skinned);
        let request = BakeRequest::new(target.as_ref(), &batches, settings).with_scene(scene);
        self.bake(request)
    }
}
