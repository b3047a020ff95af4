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

//! Copies a finished surface back to the CPU.

use aobake_core::renderer::{PixelBuffer, SurfaceDevice, SurfaceId};
use aobake_core::{BakeError, SurfaceError};

/// Reads `surface` into a new [`PixelBuffer`] of the surface's size.
///
/// The surface is left untouched and stays owned by the caller.
pub fn extract_image(
    device: &dyn SurfaceDevice,
    surface: SurfaceId,
) -> Result<PixelBuffer, BakeError> {
    let (width, height) = device.surface_size(surface)?;
    let pixels = device.read_back(surface)?;
    if pixels.size() != (width, height) {
        return Err(SurfaceError::SizeMismatch {
            expected: (width, height),
            actual: pixels.size(),
        }
        .into());
    }
    log::debug!("Read back {:?} ({}x{})", surface, width, height);
    Ok(pixels)
}
