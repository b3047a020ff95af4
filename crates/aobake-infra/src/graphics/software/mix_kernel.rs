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
use aobake_core::renderer::{BlendKernel, PixelBuffer, SurfaceDevice, SurfaceId};
use aobake_core::{BakeError, SurfaceError};

/// Neighbour offsets checked by dilation: edge neighbours first, then corners.
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// The `"ao/mix"` kernel, evaluated on the CPU.
///
/// Works with any [`SurfaceDevice`]: inputs are read back, combined, and the
/// result uploaded into the output surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuMixKernel;

impl CpuMixKernel {
    /// Creates the kernel.
    pub fn new() -> Self {
        Self
    }
}

impl BlendKernel for CpuMixKernel {
    fn blend(
        &self,
        device: &mut dyn SurfaceDevice,
        accumulator: SurfaceId,
        slices: &[SurfaceId],
        weight: f32,
        output: SurfaceId,
    ) -> Result<(), BakeError> {
        if slices.is_empty() || slices.len() > 3 {
            return Err(BakeError::Kernel(format!(
                "blend expects 1 to 3 slices, got {}",
                slices.len()
            )));
        }

        let mut result = device.read_back(accumulator)?;
        for &slice in slices {
            let pixels = device.read_back(slice)?;
            check_size(&result, &pixels)?;
            for (acc, s) in result.texels_mut().iter_mut().zip(pixels.texels()) {
                *acc = LinearRgba::new(
                    acc.r + weight * s.r,
                    acc.g + weight * s.g,
                    acc.b + weight * s.b,
                    acc.a.max(s.a),
                );
            }
        }

        device.upload(output, &result)?;
        Ok(())
    }

    fn dilate(
        &self,
        device: &mut dyn SurfaceDevice,
        source: SurfaceId,
        output: SurfaceId,
    ) -> Result<(), BakeError> {
        let pixels = device.read_back(source)?;
        device.upload(output, &dilate_once(&pixels))?;
        Ok(())
    }
}

/// Grows written texels (alpha > 0) by one texel into unwritten ones.
///
/// Each unwritten texel takes the value of the first written neighbour found,
/// edge neighbours before corners. Written texels are copied unchanged.
pub fn dilate_once(source: &PixelBuffer) -> PixelBuffer {
    let (width, height) = source.size();
    let mut out = source.clone();
    for y in 0..height {
        for x in 0..width {
            let Some(texel) = source.get(x, y) else {
                continue;
            };
            if texel.is_written() {
                continue;
            }
            let neighbour = NEIGHBOURS.iter().find_map(|&(dx, dy)| {
                let nx = u32::try_from(x as i32 + dx).ok()?;
                let ny = u32::try_from(y as i32 + dy).ok()?;
                source.get(nx, ny).filter(LinearRgba::is_written)
            });
            if let Some(value) = neighbour {
                out.set(x, y, value);
            }
        }
    }
    out
}

fn check_size(expected: &PixelBuffer, actual: &PixelBuffer) -> Result<(), SurfaceError> {
    if expected.size() != actual.size() {
        return Err(SurfaceError::SizeMismatch {
            expected: expected.size(),
            actual: actual.size(),
        });
    }
    Ok(())
}
