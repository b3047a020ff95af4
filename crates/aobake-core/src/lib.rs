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

//! # AO Bake Core
//!
//! Foundational crate containing the math primitives, bake settings, error types
//! and the interface contracts (surfaces, kernels, scene queries) that the rest
//! of the baker is written against.
//!
//! Nothing in this crate talks to a real graphics API. Concrete backends live in
//! `aobake-infra`, the hot-path algorithms in `aobake-lanes`, and the bake entry
//! point in `aobake-agents`.

#![warn(missing_docs)]

pub mod cancel;
pub mod error;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use cancel::CancelToken;
pub use error::{BakeError, ConfigError, SurfaceError};
pub use settings::{BakeSettings, SamplerType};
