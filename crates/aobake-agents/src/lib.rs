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

//! # AO Bake Agents
//!
//! Orchestrates the lanes of `aobake-lanes` into a complete bake. The
//! [`BakeAgent`](bake_agent::BakeAgent) validates a request, resolves the
//! kernels, culls occluders against the target, runs the accumulation lane and
//! reads the result back.

#![warn(missing_docs)]

pub mod bake_agent;

pub use aobake_lanes::{BakeStats, BakeStatus};
pub use bake_agent::{BakeAgent, BakeRequest, BakeResult};
