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

//! Provides the backend-agnostic rendering contracts of the baker.
//!
//! This module defines the "what" of baking: render surfaces and how they are
//! acquired and released ([`SurfaceDevice`]), the two kernels the scheduler
//! invokes ([`OcclusionKernel`], [`BlendKernel`]) and a registry that resolves
//! kernels by name. The "how" lives in `aobake-infra` (or in a host engine),
//! which implements these traits. The lanes only ever see the traits.

pub mod kernel_registry;
pub mod surface;
pub mod traits;

pub use self::kernel_registry::{KernelRegistry, BLEND_KERNEL, OCCLUSION_KERNEL};
pub use self::surface::{PixelBuffer, SurfaceId};
pub use self::traits::{BlendKernel, OcclusionDraw, OcclusionKernel, SurfaceDevice};
