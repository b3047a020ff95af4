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

use aobake_core::math::LinearRgba;
use aobake_core::renderer::{PixelBuffer, SurfaceDevice, SurfaceId};
use aobake_core::SurfaceError;
use std::collections::HashMap;

const BYTES_PER_TEXEL: u64 = std::mem::size_of::<LinearRgba>() as u64;

/// Acquire/release counters of a [`SoftwareDevice`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Surfaces handed out since creation.
    pub acquired: u64,
    /// Surfaces given back since creation.
    pub released: u64,
    /// Bytes held by live surfaces.
    pub live_bytes: u64,
    /// Highest value `live_bytes` ever reached.
    pub peak_bytes: u64,
}

impl SurfaceStats {
    /// Number of surfaces currently alive.
    pub fn live(&self) -> u64 {
        self.acquired - self.released
    }
}

/// An in-memory [`SurfaceDevice`].
///
/// Every surface is an RGBA `f32` [`PixelBuffer`]. Handles are never reused, so
/// a stale handle always fails with [`SurfaceError::InvalidHandle`].
#[derive(Debug, Default)]
pub struct SoftwareDevice {
    surfaces: HashMap<SurfaceId, PixelBuffer>,
    next_id: u64,
    stats: SurfaceStats,
}

impl SoftwareDevice {
    /// Creates a device with no surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Returns `true` if `id` names a live surface.
    pub fn is_live(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    /// Direct read access to a live surface's texels.
    pub fn surface(&self, id: SurfaceId) -> Option<&PixelBuffer> {
        self.surfaces.get(&id)
    }

    fn get(&self, id: SurfaceId) -> Result<&PixelBuffer, SurfaceError> {
        self.surfaces
            .get(&id)
            .ok_or(SurfaceError::InvalidHandle(id))
    }

    fn get_mut(&mut self, id: SurfaceId) -> Result<&mut PixelBuffer, SurfaceError> {
        self.surfaces
            .get_mut(&id)
            .ok_or(SurfaceError::InvalidHandle(id))
    }
}

impl SurfaceDevice for SoftwareDevice {
    fn acquire(&mut self, width: u32, height: u32) -> Result<SurfaceId, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        let surface = PixelBuffer::new(width, height, LinearRgba::TRANSPARENT);
        self.surfaces.insert(id, surface);

        self.stats.acquired += 1;
        self.stats.live_bytes += width as u64 * height as u64 * BYTES_PER_TEXEL;
        self.stats.peak_bytes = self.stats.peak_bytes.max(self.stats.live_bytes);
        log::trace!("SoftwareDevice: acquired {:?} ({}x{})", id, width, height);
        Ok(id)
    }

    fn release(&mut self, id: SurfaceId) -> Result<(), SurfaceError> {
        let surface = self
            .surfaces
            .remove(&id)
            .ok_or(SurfaceError::InvalidHandle(id))?;
        let (width, height) = surface.size();
        self.stats.released += 1;
        self.stats.live_bytes -= width as u64 * height as u64 * BYTES_PER_TEXEL;
        log::trace!("SoftwareDevice: released {:?}", id);
        Ok(())
    }

    fn surface_size(&self, id: SurfaceId) -> Result<(u32, u32), SurfaceError> {
        self.get(id).map(PixelBuffer::size)
    }

    fn clear(&mut self, id: SurfaceId, color: LinearRgba) -> Result<(), SurfaceError> {
        self.get_mut(id)?.texels_mut().fill(color);
        Ok(())
    }

    fn blit(&mut self, src: SurfaceId, dst: SurfaceId) -> Result<(), SurfaceError> {
        let source = self.get(src)?.clone();
        self.upload(dst, &source)
    }

    fn read_back(&self, id: SurfaceId) -> Result<PixelBuffer, SurfaceError> {
        self.get(id).cloned()
    }

    fn upload(&mut self, id: SurfaceId, pixels: &PixelBuffer) -> Result<(), SurfaceError> {
        let surface = self.get_mut(id)?;
        if surface.size() != pixels.size() {
            return Err(SurfaceError::SizeMismatch {
                expected: surface.size(),
                actual: pixels.size(),
            });
        }
        surface.texels_mut().copy_from_slice(pixels.texels());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_accounting() -> anyhow::Result<()> {
        let mut device = SoftwareDevice::new();
        let a = device.acquire(4, 4)?;
        let b = device.acquire(2, 2)?;
        assert_eq!(device.stats().live(), 2);
        assert_eq!(device.stats().live_bytes, (16 + 4) * 16);

        device.release(a)?;
        assert_eq!(device.stats().live_bytes, 4 * 16);
        assert_eq!(device.stats().peak_bytes, 20 * 16);
        assert!(matches!(
            device.release(a),
            Err(SurfaceError::InvalidHandle(id)) if id == a
        ));

        device.release(b)?;
        assert_eq!(device.stats().acquired, device.stats().released);
        Ok(())
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut device = SoftwareDevice::new();
        assert!(matches!(
            device.acquire(0, 16),
            Err(SurfaceError::ZeroSize { width: 0, .. })
        ));
        assert_eq!(device.stats().acquired, 0);
    }

    #[test]
    fn test_clear_blit_read_back() -> anyhow::Result<()> {
        let mut device = SoftwareDevice::new();
        let a = device.acquire(3, 3)?;
        let b = device.acquire(3, 3)?;
        device.clear(a, LinearRgba::WHITE)?;
        device.blit(a, b)?;
        assert!(device
            .read_back(b)?
            .texels()
            .iter()
            .all(|t| *t == LinearRgba::WHITE));

        let small = device.acquire(2, 2)?;
        assert!(matches!(
            device.blit(a, small),
            Err(SurfaceError::SizeMismatch { .. })
        ));
        Ok(())
    }
}
