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

//! # AO Bake Lanes
//!
//! The hot-path pipelines of the baker. Each lane is a self-contained stage:
//!
//! - [`sampler_lane`] generates the stochastic sample sets.
//! - [`geometry_lane`] turns scene sources into vertex-capped bake batches.
//! - [`bake_lane`] drives the accumulation state machine and the padding passes.
//! - [`readback_lane`] copies the finished surface back to the CPU.
//!
//! Lanes depend only on the contracts in `aobake-core`; they never see a
//! concrete device or kernel.

#![warn(missing_docs)]

pub mod bake_lane;
pub mod geometry_lane;
pub mod readback_lane;
pub mod sampler_lane;

pub use bake_lane::{BakeCursor, BakeKernels, BakeLane, BakeOutcome, BakeStats, BakeStatus};
pub use geometry_lane::{collect_batches, BakeBatch, VertexGroup, VERTEX_GROUP_CAPACITY};
pub use readback_lane::extract_image;
pub use sampler_lane::{radical_inverse_2, Sampler, DEFAULT_NUM_SETS};
