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

//! Bake settings, their defaults and limits, and RON loading.
//!
//! Settings are immutable for the duration of one bake. Hosts usually build
//! them from a UI or a `.ron` file and pass them through
//! [`BakeSettings::sanitized`] before baking.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default effective radius of the occlusion trace, in world units.
pub const DEFAULT_TRACE_RADIUS: f32 = 1.0;
/// Smallest accepted trace radius.
pub const MIN_TRACE_RADIUS: f32 = 0.01;
/// Default sampling strategy.
pub const DEFAULT_SAMPLER_TYPE: SamplerType = SamplerType::Hammersley;
/// Default number of sample points per texel.
pub const DEFAULT_NUM_SAMPLES: u32 = 25;
/// Smallest accepted sample count.
pub const MIN_NUM_SAMPLES: u32 = 3;
/// Largest accepted sample count.
pub const MAX_NUM_SAMPLES: u32 = 128;
/// Default output resolution.
pub const DEFAULT_AO_MAP_SIZE: u32 = 1024;
/// Resolutions offered as presets.
pub const AO_MAP_SIZE_PRESETS: [u32; 4] = [256, 512, 1024, 2048];
/// Default number of UV dilation passes.
pub const DEFAULT_AO_MAP_PADDING: u32 = 2;
/// Smallest accepted number of dilation passes.
pub const MIN_AO_MAP_PADDING: u32 = 1;
/// Largest accepted number of dilation passes.
pub const MAX_AO_MAP_PADDING: u32 = 10;
/// Back faces are culled by default.
pub const DEFAULT_CULL_BACK: bool = true;

/// The strategy used to generate sample points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerType {
    /// Independent uniform draws.
    Random,
    /// One uniformly jittered point per cell of an `n x n` grid.
    Jittered,
    /// The Hammersley low-discrepancy point set.
    Hammersley,
    /// Cell centres of an `n x n` grid.
    Regular,
}

impl SamplerType {
    /// All sampler types, in declaration order.
    pub const ALL: [SamplerType; 4] = [
        SamplerType::Random,
        SamplerType::Jittered,
        SamplerType::Hammersley,
        SamplerType::Regular,
    ];

    /// Returns `true` for strategies that lay points on an `n x n` grid and
    /// therefore round the sample count down to a perfect square.
    pub fn is_grid(&self) -> bool {
        matches!(self, SamplerType::Jittered | SamplerType::Regular)
    }
}

impl Default for SamplerType {
    fn default() -> Self {
        DEFAULT_SAMPLER_TYPE
    }
}

impl std::fmt::Display for SamplerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerType::Random => write!(f, "Random"),
            SamplerType::Jittered => write!(f, "Jittered"),
            SamplerType::Hammersley => write!(f, "Hammersley"),
            SamplerType::Regular => write!(f, "Regular"),
        }
    }
}

/// The parameters of one bake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    /// Effective radius of the occlusion trace, in world units.
    pub trace_radius: f32,
    /// Sample point generation strategy.
    pub sampler_type: SamplerType,
    /// Number of sample points accumulated per texel.
    pub num_samples: u32,
    /// Width and height of the output map, in texels.
    pub ao_map_size: u32,
    /// Number of UV border dilation passes applied after sampling.
    pub ao_map_padding: u32,
    /// Whether the occlusion kernel ignores back faces.
    pub cull_back: bool,
    /// Seed for the sampler's random source. `None` draws a fresh seed per bake.
    pub seed: Option<u64>,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            trace_radius: DEFAULT_TRACE_RADIUS,
            sampler_type: DEFAULT_SAMPLER_TYPE,
            num_samples: DEFAULT_NUM_SAMPLES,
            ao_map_size: DEFAULT_AO_MAP_SIZE,
            ao_map_padding: DEFAULT_AO_MAP_PADDING,
            cull_back: DEFAULT_CULL_BACK,
            seed: None,
        }
    }
}

impl BakeSettings {
    /// Returns a copy with every field forced into its accepted range.
    ///
    /// A map size that is not one of [`AO_MAP_SIZE_PRESETS`] snaps to the
    /// nearest preset.
    pub fn sanitized(&self) -> Self {
        let trace_radius = if self.trace_radius.is_finite() {
            self.trace_radius.max(MIN_TRACE_RADIUS)
        } else {
            DEFAULT_TRACE_RADIUS
        };
        let ao_map_size = AO_MAP_SIZE_PRESETS
            .iter()
            .copied()
            .min_by_key(|preset| preset.abs_diff(self.ao_map_size))
            .unwrap_or(DEFAULT_AO_MAP_SIZE);

        Self {
            trace_radius,
            sampler_type: self.sampler_type,
            num_samples: self.num_samples.clamp(MIN_NUM_SAMPLES, MAX_NUM_SAMPLES),
            ao_map_size,
            ao_map_padding: self
                .ao_map_padding
                .clamp(MIN_AO_MAP_PADDING, MAX_AO_MAP_PADDING),
            cull_back: self.cull_back,
            seed: self.seed,
        }
    }

    /// Blend weight applied to every sample slice.
    ///
    /// Each slice carries the sum of one sample triple, so the weight spreads
    /// evenly over `num_samples * 3` contributions.
    pub fn sample_weight(&self) -> f32 {
        1.0 / (self.num_samples.max(1) as f32 * 3.0)
    }

    /// Parses settings from RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::de::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serializes the settings to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads settings from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_ron_str(&text)?;
        log::debug!("Loaded bake settings from '{}'", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = BakeSettings::default();
        assert_eq!(s.num_samples, 25);
        assert_eq!(s.ao_map_size, 1024);
        assert_eq!(s.ao_map_padding, 2);
        assert_eq!(s.sampler_type, SamplerType::Hammersley);
        assert!(s.cull_back);
    }

    #[test]
    fn test_sanitized_clamps_every_field() {
        let s = BakeSettings {
            trace_radius: -3.0,
            num_samples: 500,
            ao_map_size: 700,
            ao_map_padding: 0,
            ..Default::default()
        }
        .sanitized();
        assert_relative_eq!(s.trace_radius, MIN_TRACE_RADIUS);
        assert_eq!(s.num_samples, MAX_NUM_SAMPLES);
        assert_eq!(s.ao_map_size, 512);
        assert_eq!(s.ao_map_padding, MIN_AO_MAP_PADDING);

        let low = BakeSettings {
            num_samples: 1,
            ao_map_padding: 42,
            trace_radius: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(low.num_samples, MIN_NUM_SAMPLES);
        assert_eq!(low.ao_map_padding, MAX_AO_MAP_PADDING);
        assert_relative_eq!(low.trace_radius, DEFAULT_TRACE_RADIUS);
    }

    #[test]
    fn test_sample_weight() {
        let s = BakeSettings {
            num_samples: 10,
            ..Default::default()
        };
        assert_relative_eq!(s.sample_weight(), 1.0 / 30.0);
    }

    #[test]
    fn test_ron_partial_fields_use_defaults() {
        let s = BakeSettings::from_ron_str("(num_samples: 9, sampler_type: Regular)").unwrap();
        assert_eq!(s.num_samples, 9);
        assert_eq!(s.sampler_type, SamplerType::Regular);
        assert_eq!(s.ao_map_size, DEFAULT_AO_MAP_SIZE);
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let original = BakeSettings {
            seed: Some(1234),
            cull_back: false,
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(original.to_ron_string().unwrap().as_bytes())
            .unwrap();
        let loaded = BakeSettings::load(file.path()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_ron_parse_error() {
        let err = BakeSettings::from_ron_str("(num_samples: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BakeSettings::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
