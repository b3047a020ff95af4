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

//! # AO Bake Infra
//!
//! Concrete implementations of the contracts defined in `aobake-core`:
//!
//! - [`graphics::software::SoftwareDevice`], an in-memory [`SurfaceDevice`]
//!   with acquire/release accounting.
//! - [`graphics::software::CpuMixKernel`], the blend and dilation kernel on the CPU.
//! - [`scene::MemoryScene`], a plain list of render sources.
//! - [`image_export`], conversion of baked maps to `image` buffers.
//!
//! [`SurfaceDevice`]: aobake_core::renderer::SurfaceDevice

#![warn(missing_docs)]

pub mod graphics;
pub mod image_export;
pub mod scene;

pub use graphics::software::{CpuMixKernel, SoftwareDevice, SurfaceStats};
pub use image_export::to_rgba_image;
pub use scene::MemoryScene;
