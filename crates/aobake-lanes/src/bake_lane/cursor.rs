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

/// Number of samples merged into the accumulator per blend window.
pub const BLEND_WINDOW: usize = 3;

/// Position of the bake state machine.
///
/// The cursor walks vertex groups inside batches, batches inside samples, and
/// samples inside blend windows of up to [`BLEND_WINDOW`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeCursor {
    /// Index of the batch being drawn.
    pub batch_index: usize,
    /// Index of the vertex group being drawn within the batch.
    pub vertex_group_index: usize,
    /// Index of the slice (sample within the current window) being drawn.
    pub sample_step: usize,
    /// Number of samples already merged into the accumulator.
    pub sample_index: u32,
}

/// What the scheduler must do after a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Draw the next vertex group of the same batch.
    NextGroup,
    /// Draw the first vertex group of the next batch.
    NextBatch,
    /// Every batch was drawn for this sample: draw a fresh sample triple into
    /// the next slice.
    NextSample,
    /// The window is complete: draw a fresh triple and blend `count` slices
    /// into the accumulator. When `finished`, every sample is accumulated and
    /// padding follows.
    Blend {
        /// Number of slices in the window.
        count: usize,
        /// Whether this window was the last one.
        finished: bool,
    },
}

impl BakeCursor {
    /// Advances past the draw that was just issued.
    ///
    /// `group_count` is the number of vertex groups of the current batch,
    /// `batch_count` the number of batches. Both must be non-zero.
    pub fn advance(
        &mut self,
        group_count: usize,
        batch_count: usize,
        num_samples: u32,
    ) -> Transition {
        self.vertex_group_index += 1;
        if self.vertex_group_index < group_count {
            return Transition::NextGroup;
        }

        self.vertex_group_index = 0;
        self.batch_index += 1;
        if self.batch_index < batch_count {
            return Transition::NextBatch;
        }

        self.batch_index = 0;
        self.sample_step += 1;
        let remaining = self.remaining_in_window(num_samples);
        if self.sample_step < remaining {
            return Transition::NextSample;
        }

        self.sample_step = 0;
        self.sample_index += remaining as u32;
        Transition::Blend {
            count: remaining,
            finished: self.sample_index >= num_samples,
        }
    }

    /// Size of the current window: three, or fewer on the last one.
    pub fn remaining_in_window(&self, num_samples: u32) -> usize {
        (num_samples.saturating_sub(self.sample_index) as usize).min(BLEND_WINDOW)
    }

    /// Fraction of samples accumulated, in `[0, 1]`.
    pub fn progress(&self, num_samples: u32) -> f32 {
        if num_samples == 0 {
            return 1.0;
        }
        (self.sample_index as f32 / num_samples as f32).min(1.0)
    }
}
