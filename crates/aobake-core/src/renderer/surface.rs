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

//! Surface handles and the CPU-side pixel buffer.

use crate::math::LinearRgba;

/// An opaque handle to a render surface owned by a [`SurfaceDevice`](super::SurfaceDevice).
///
/// Handles are plain values; ownership is tracked by whoever holds the handle
/// and is responsible for releasing it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// A CPU-addressable RGBA image.
///
/// Texels are stored row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    texels: Vec<LinearRgba>,
}

impl PixelBuffer {
    /// Creates a buffer of the given size with every texel set to `fill`.
    pub fn new(width: u32, height: u32, fill: LinearRgba) -> Self {
        Self {
            width,
            height,
            texels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wraps existing texel data.
    ///
    /// Returns `None` when the texel count does not match `width * height`.
    pub fn from_texels(width: u32, height: u32, texels: Vec<LinearRgba>) -> Option<Self> {
        (texels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            texels,
        })
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// All texels, row-major.
    pub fn texels(&self) -> &[LinearRgba] {
        &self.texels
    }

    /// All texels, row-major, mutably.
    pub fn texels_mut(&mut self) -> &mut [LinearRgba] {
        &mut self.texels
    }

    /// Returns the texel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<LinearRgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Writes the texel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: LinearRgba) {
        if x < self.width && y < self.height {
            let index = y as usize * self.width as usize + x as usize;
            self.texels[index] = value;
        }
    }

    /// Returns the raw `f32` RGBA bytes, ready for an upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Returns the texels quantized to 8-bit RGBA, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.texels.iter().flat_map(|t| t.to_rgba8()).collect()
    }

    /// Number of texels that carry coverage (alpha > 0).
    pub fn written_count(&self) -> usize {
        self.texels.iter().filter(|t| t.is_written()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut buf = PixelBuffer::new(2, 3, LinearRgba::TRANSPARENT);
        buf.set(1, 2, LinearRgba::WHITE);
        buf.set(5, 5, LinearRgba::WHITE);
        assert_eq!(buf.get(1, 2), Some(LinearRgba::WHITE));
        assert_eq!(buf.get(2, 0), None);
        assert_eq!(buf.written_count(), 1);
    }

    #[test]
    fn test_from_texels_checks_len() {
        let short = PixelBuffer::from_texels(2, 2, vec![LinearRgba::BLACK; 3]);
        assert!(short.is_none());
        let exact = PixelBuffer::from_texels(2, 2, vec![LinearRgba::BLACK; 4]);
        assert!(exact.is_some());
    }

    #[test]
    fn test_byte_views() {
        let buf = PixelBuffer::new(4, 4, LinearRgba::WHITE);
        assert_eq!(buf.as_bytes().len(), 16 * 16);
        assert_eq!(buf.to_rgba8().len(), 16 * 4);
        assert!(buf.to_rgba8().iter().all(|&b| b == 255));
    }
}
