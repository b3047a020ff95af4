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

//! Conversion of baked maps into `image` crate buffers.
//!
//! Encoding and writing files is left to the caller; `image` provides both
//! once the map is an [`RgbaImage`].

use aobake_core::math::LinearRgba;
use aobake_core::renderer::PixelBuffer;
use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Quantizes a pixel buffer to 8-bit RGBA, clamping every channel to `[0, 1]`.
pub fn to_rgba_image(pixels: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        Rgba(pixels.get(x, y).unwrap_or_default().to_rgba8())
    })
}

/// Extracts the occlusion term (red channel) as an 8-bit grayscale image.
pub fn to_occlusion_image(pixels: &PixelBuffer) -> GrayImage {
    GrayImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let texel = pixels.get(x, y).unwrap_or(LinearRgba::TRANSPARENT);
        Luma([texel.to_rgba8()[0]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_conversion_clamps() {
        let mut pixels = PixelBuffer::new(2, 1, LinearRgba::TRANSPARENT);
        pixels.set(0, 0, LinearRgba::new(2.0, -1.0, 0.5, 1.0));
        let image = to_rgba_image(&pixels);

        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 128, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_occlusion_image_takes_red() {
        let pixels = PixelBuffer::new(1, 1, LinearRgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(to_occlusion_image(&pixels).get_pixel(0, 0).0, [255]);
    }
}
