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

use crate::math::LinearRgba;
use crate::renderer::{PixelBuffer, SurfaceId};
use crate::SurfaceError;
use std::fmt::Debug;

/// A backend that hands out temporary render surfaces.
///
/// Every surface obtained through [`acquire`](SurfaceDevice::acquire) must be
/// given back through [`release`](SurfaceDevice::release) exactly once. A
/// released handle is dead; any further use must fail with
/// [`SurfaceError::InvalidHandle`].
pub trait SurfaceDevice: Debug {
    /// Obtains a temporary RGBA surface of the given size.
    ///
    /// The content of a freshly acquired surface is undefined; callers that
    /// need a known state must [`clear`](SurfaceDevice::clear) it.
    fn acquire(&mut self, width: u32, height: u32) -> Result<SurfaceId, SurfaceError>;

    /// Returns a surface to the device.
    fn release(&mut self, id: SurfaceId) -> Result<(), SurfaceError>;

    /// Returns the `(width, height)` of a live surface.
    fn surface_size(&self, id: SurfaceId) -> Result<(u32, u32), SurfaceError>;

    /// Fills every texel of a surface with `color`.
    fn clear(&mut self, id: SurfaceId, color: LinearRgba) -> Result<(), SurfaceError>;

    /// Copies `src` into `dst`. Both must have the same size.
    fn blit(&mut self, src: SurfaceId, dst: SurfaceId) -> Result<(), SurfaceError>;

    /// Copies a surface's content into a new CPU buffer.
    fn read_back(&self, id: SurfaceId) -> Result<PixelBuffer, SurfaceError>;

    /// Overwrites a surface with the content of a CPU buffer of the same size.
    fn upload(&mut self, id: SurfaceId, pixels: &PixelBuffer) -> Result<(), SurfaceError>;
}
