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

use aobake_core::renderer::PixelBuffer;
use aobake_core::scene::{BakeTarget, SceneQuery};
use aobake_core::{BakeSettings, CancelToken};
use aobake_lanes::{BakeBatch, BakeStats, BakeStatus};

/// Everything one bake needs.
pub struct BakeRequest<'a> {
    /// The object whose occlusion map is baked.
    pub target: Option<&'a BakeTarget>,
    /// Occluder batches, usually from [`collect_batches`](aobake_lanes::collect_batches).
    pub batches: &'a [BakeBatch],
    /// The live scene, used to read current world bounds while culling.
    pub scene: Option<&'a dyn SceneQuery>,
    /// Bake parameters. Sanitized before use.
    pub settings: &'a BakeSettings,
    /// Receives the accumulated fraction after every tick.
    pub progress: Option<&'a mut dyn FnMut(f32)>,
    /// Stops the bake at the next tick once fired.
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> BakeRequest<'a> {
    /// Creates a request without scene, progress callback or cancel token.
    pub fn new(
        target: Option<&'a BakeTarget>,
        batches: &'a [BakeBatch],
        settings: &'a BakeSettings,
    ) -> Self {
        Self {
            target,
            batches,
            scene: None,
            settings,
            progress: None,
            cancel: None,
        }
    }

    /// Reads live bounds from `scene` while culling.
    pub fn with_scene(mut self, scene: &'a dyn SceneQuery) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Reports progress to `progress`.
    pub fn with_progress(mut self, progress: &'a mut dyn FnMut(f32)) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Makes the bake cancellable through `cancel`.
    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl std::fmt::Debug for BakeRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BakeRequest")
            .field("target", &self.target.map(|t| t.source))
            .field("batches", &self.batches.len())
            .field("settings", self.settings)
            .field("has_scene", &self.scene.is_some())
            .field("has_progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// The outcome of a bake.
#[derive(Debug, Clone, PartialEq)]
pub struct BakeResult {
    /// The baked map, `ao_map_size x ao_map_size` RGBA.
    pub image: PixelBuffer,
    /// Whether every sample was accumulated.
    pub status: BakeStatus,
    /// Counters of the run.
    pub stats: BakeStats,
}

impl BakeResult {
    /// Returns `true` if the bake ran to completion.
    pub fn is_complete(&self) -> bool {
        self.status == BakeStatus::Completed
    }
}
