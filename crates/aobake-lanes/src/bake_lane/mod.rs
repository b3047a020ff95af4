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

//! The accumulation state machine.
//!
//! A [`BakeLane`] owns every surface of one bake: the running accumulator and
//! up to three sample slices. Each [`tick`](BakeLane::tick) draws one vertex
//! group of one batch for the current sample into its slice. Once every batch
//! was drawn for a window of up to three samples, the slices are blended into
//! a fresh accumulator and released. After the last window the accumulator is
//! dilated `ao_map_padding` times.
//!
//! Every surface the lane holds is released when the lane is dropped, so a
//! failed or cancelled bake never leaks. Only a completed or cancelled run
//! hands its accumulator out to the caller.

mod cursor;

pub use self::cursor::{BakeCursor, Transition, BLEND_WINDOW};

use crate::geometry_lane::BakeBatch;
use crate::sampler_lane::Sampler;
use aobake_core::math::{LinearRgba, Vec2};
use aobake_core::renderer::{
    BlendKernel, KernelRegistry, OcclusionDraw, OcclusionKernel, SurfaceDevice, SurfaceId,
    BLEND_KERNEL, OCCLUSION_KERNEL,
};
use aobake_core::scene::BakeTarget;
use aobake_core::{BakeError, BakeSettings, CancelToken, SurfaceError};
use std::sync::Arc;

/// The two kernels a bake runs, resolved from a [`KernelRegistry`].
#[derive(Clone)]
pub struct BakeKernels {
    /// Draws per-texel occlusion for one vertex group.
    pub occlusion: Arc<dyn OcclusionKernel>,
    /// Blends sample slices and dilates the finished map.
    pub blend: Arc<dyn BlendKernel>,
}

impl BakeKernels {
    /// Resolves `"ao/bake"` and `"ao/mix"`.
    pub fn resolve(registry: &KernelRegistry) -> Result<Self, BakeError> {
        Ok(Self {
            occlusion: registry.occlusion(OCCLUSION_KERNEL)?,
            blend: registry.blend(BLEND_KERNEL)?,
        })
    }
}

impl std::fmt::Debug for BakeKernels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BakeKernels").finish_non_exhaustive()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeStatus {
    /// Every sample was accumulated and the map was padded.
    Completed,
    /// The cancel token fired. The accumulator holds the windows blended so far.
    Cancelled,
}

/// Counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeStats {
    /// Number of ticks executed.
    pub ticks: u64,
    /// Number of occlusion draws issued.
    pub draw_calls: u64,
    /// Number of blend windows merged into the accumulator.
    pub blend_windows: u32,
    /// Number of dilation passes applied.
    pub padding_passes: u32,
}

/// The result of a run: the accumulator, now owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakeOutcome {
    /// The final surface. The caller must release it.
    pub surface: SurfaceId,
    /// How the run ended.
    pub status: BakeStatus,
    /// Run counters.
    pub stats: BakeStats,
}

/// Drives one bake over a [`SurfaceDevice`].
#[derive(Debug)]
pub struct BakeLane<'a> {
    device: &'a mut dyn SurfaceDevice,
    kernels: BakeKernels,
    settings: BakeSettings,
    sampler: Sampler,
    target: &'a BakeTarget,
    accumulator: Option<SurfaceId>,
    slices: [Option<SurfaceId>; BLEND_WINDOW],
    cursor: BakeCursor,
    samples: [Vec2; 3],
    stats: BakeStats,
}

impl<'a> BakeLane<'a> {
    /// Prepares a bake: acquires the accumulator, clears it to transparent and
    /// draws the first sample triple.
    ///
    /// Settings are sanitized on the way in.
    pub fn new(
        device: &'a mut dyn SurfaceDevice,
        kernels: BakeKernels,
        settings: &BakeSettings,
        sampler: Sampler,
        target: &'a BakeTarget,
    ) -> Result<Self, BakeError> {
        let settings = settings.sanitized();
        let mut lane = Self {
            device,
            kernels,
            settings,
            sampler,
            target,
            accumulator: None,
            slices: [None; BLEND_WINDOW],
            cursor: BakeCursor::default(),
            samples: [Vec2::ZERO; 3],
            stats: BakeStats::default(),
        };

        let accumulator = lane.acquire()?;
        lane.accumulator = Some(accumulator);
        lane.device.clear(accumulator, LinearRgba::TRANSPARENT)?;
        lane.samples = lane.sampler.sample_triple();
        Ok(lane)
    }

    /// The current state machine position.
    pub fn cursor(&self) -> BakeCursor {
        self.cursor
    }

    /// Counters so far.
    pub fn stats(&self) -> BakeStats {
        self.stats
    }

    /// The settings in effect, after sanitizing.
    pub fn settings(&self) -> &BakeSettings {
        &self.settings
    }

    /// Fraction of samples accumulated so far.
    pub fn progress(&self) -> f32 {
        self.cursor.progress(self.settings.num_samples)
    }

    /// Runs the bake to completion or cancellation.
    ///
    /// Batches without vertex groups are ignored. With no batch left, no tick
    /// runs and the cleared accumulator is returned as is. `progress` receives
    /// the accumulated fraction after every tick.
    pub fn run<'b>(
        mut self,
        batches: impl IntoIterator<Item = &'b BakeBatch>,
        mut progress: Option<&mut dyn FnMut(f32)>,
        cancel: Option<&CancelToken>,
    ) -> Result<BakeOutcome, BakeError> {
        let batches: Vec<&BakeBatch> = batches
            .into_iter()
            .filter(|b| !b.vertex_groups.is_empty())
            .collect();
        if batches.is_empty() {
            log::debug!("No occluder batch to draw, returning the cleared accumulator");
            return self.finish(BakeStatus::Completed);
        }

        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                log::info!(
                    "Bake cancelled after {} of {} samples",
                    self.cursor.sample_index,
                    self.settings.num_samples
                );
                return self.finish(BakeStatus::Cancelled);
            }

            let finished = self.tick(&batches)?;
            if let Some(report) = progress.as_deref_mut() {
                report(self.progress());
            }
            if finished {
                return self.finish(BakeStatus::Completed);
            }
        }
    }

    /// Executes one draw and advances the state machine.
    ///
    /// Returns `true` once every sample is accumulated and padding was applied.
    /// Fails with [`BakeError::EmptyInput`] when the cursor points at no vertex
    /// group, which happens if `batches` is empty or holds an empty batch.
    pub fn tick(&mut self, batches: &[&BakeBatch]) -> Result<bool, BakeError> {
        let batch = *batches
            .get(self.cursor.batch_index)
            .ok_or(BakeError::EmptyInput("no batch to draw"))?;
        let group = batch
            .vertex_groups
            .get(self.cursor.vertex_group_index)
            .ok_or(BakeError::EmptyInput("batch has no vertex group"))?;
        let step = self.cursor.sample_step;

        let (output, previous) = match self.slices[step] {
            Some(slice) => {
                let previous = self.acquire()?;
                if let Err(e) = self.device.blit(slice, previous) {
                    self.release_quietly(previous);
                    return Err(e.into());
                }
                (slice, Some(previous))
            }
            None => {
                let slice = self.acquire()?;
                self.slices[step] = Some(slice);
                (slice, None)
            }
        };

        let draw = OcclusionDraw {
            target: self.target,
            vertices: group.vertices(),
            local_to_world: batch.local_to_world,
            previous,
            samples: self.samples,
            trace_radius: self.settings.trace_radius,
            cull_back: self.settings.cull_back,
        };
        let drawn = self
            .kernels
            .occlusion
            .draw(&mut *self.device, output, &draw);
        let released = previous.map_or(Ok(()), |p| self.device.release(p));
        drawn?;
        released?;

        self.stats.ticks += 1;
        self.stats.draw_calls += 1;
        log::trace!(
            "Drew '{}' group {} into slice {} ({} vertices)",
            batch.name,
            self.cursor.vertex_group_index,
            step,
            group.len()
        );

        let group_count = batch.vertex_groups.len();
        let num_samples = self.settings.num_samples;
        match self.cursor.advance(group_count, batches.len(), num_samples) {
            Transition::NextGroup | Transition::NextBatch => Ok(false),
            Transition::NextSample => {
                self.samples = self.sampler.sample_triple();
                Ok(false)
            }
            Transition::Blend { count, finished } => {
                self.samples = self.sampler.sample_triple();
                self.blend_window(count)?;
                if finished {
                    self.apply_padding()?;
                }
                Ok(finished)
            }
        }
    }

    /// Merges the first `count` slices into a new accumulator, then releases
    /// the old accumulator and every slice.
    fn blend_window(&mut self, count: usize) -> Result<(), BakeError> {
        let accumulator = self.accumulator()?;
        let slices: Vec<SurfaceId> = self.slices[..count].iter().flatten().copied().collect();
        let weight = self.settings.sample_weight();

        let output = self.acquire()?;
        if let Err(e) = self
            .kernels
            .blend
            .blend(&mut *self.device, accumulator, &slices, weight, output)
        {
            self.release_quietly(output);
            return Err(e);
        }
        self.replace_accumulator(output)?;

        for slot in self.slices.iter_mut() {
            if let Some(slice) = slot.take() {
                self.device.release(slice)?;
            }
        }

        self.stats.blend_windows += 1;
        log::debug!(
            "Blended {} slice(s), {}/{} samples accumulated",
            slices.len(),
            self.cursor.sample_index,
            self.settings.num_samples
        );
        Ok(())
    }

    /// Dilates the accumulator `ao_map_padding` times.
    fn apply_padding(&mut self) -> Result<(), BakeError> {
        for _ in 0..self.settings.ao_map_padding {
            let source = self.accumulator()?;
            let output = self.acquire()?;
            if let Err(e) = self
                .kernels
                .blend
                .dilate(&mut *self.device, source, output)
            {
                self.release_quietly(output);
                return Err(e);
            }
            self.replace_accumulator(output)?;
            self.stats.padding_passes += 1;
        }
        log::debug!("Applied {} padding pass(es)", self.stats.padding_passes);
        Ok(())
    }

    fn finish(mut self, status: BakeStatus) -> Result<BakeOutcome, BakeError> {
        let surface = self.accumulator.take().ok_or_else(|| {
            SurfaceError::Backend("the accumulator was already handed out".to_owned())
        })?;
        Ok(BakeOutcome {
            surface,
            status,
            stats: self.stats,
        })
    }

    fn accumulator(&self) -> Result<SurfaceId, BakeError> {
        self.accumulator.ok_or_else(|| {
            BakeError::Surface(SurfaceError::Backend(
                "the accumulator was already handed out".to_owned(),
            ))
        })
    }

    fn replace_accumulator(&mut self, surface: SurfaceId) -> Result<(), BakeError> {
        if let Some(old) = self.accumulator.replace(surface) {
            self.device.release(old)?;
        }
        Ok(())
    }

    fn acquire(&mut self) -> Result<SurfaceId, BakeError> {
        let size = self.settings.ao_map_size;
        Ok(self.device.acquire(size, size)?)
    }

    fn release_quietly(&mut self, surface: SurfaceId) {
        if let Err(e) = self.device.release(surface) {
            log::warn!("Failed to release {:?}: {}", surface, e);
        }
    }
}

impl Drop for BakeLane<'_> {
    fn drop(&mut self) {
        let held: Vec<SurfaceId> = self
            .slices
            .iter_mut()
            .chain(std::iter::once(&mut self.accumulator))
            .filter_map(Option::take)
            .collect();
        for surface in held {
            self.release_quietly(surface);
        }
    }
}
