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

//! Sample set generation.
//!
//! A [`Sampler`] precomputes `num_sets` sets of `num_samples` points in the
//! unit square, plus one shuffled index table per set. Points are then handed
//! out one by one: every `num_samples` calls a new set is picked at random and
//! walked in its shuffled order. The sampler is never exhausted.

use aobake_core::math::Vec2;
use aobake_core::{BakeSettings, SamplerType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Number of sample sets generated by default.
pub const DEFAULT_NUM_SETS: usize = 83;

/// The largest `f32` strictly below one.
const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Base-2 radical inverse (van der Corput sequence) of `j`.
///
/// Mirrors the binary digits of `j` around the radix point:
/// `0b110` becomes `0.011`.
pub fn radical_inverse_2(mut j: u32) -> f32 {
    let mut x = 0.0f32;
    let mut f = 0.5f32;
    while j > 0 {
        x += f * (j & 1) as f32;
        j >>= 1;
        f *= 0.5;
    }
    x
}

/// A source of 2D sample points in `[0, 1)²`.
#[derive(Debug, Clone)]
pub struct Sampler {
    sampler_type: SamplerType,
    num_samples: usize,
    num_sets: usize,
    samples: Vec<Vec2>,
    shuffled_indices: Vec<usize>,
    count: usize,
    jump: usize,
    rng: StdRng,
}

impl Sampler {
    /// Builds a sampler.
    ///
    /// Grid strategies ([`SamplerType::is_grid`]) round `num_samples` down to a
    /// perfect square. Both counts are raised to at least one.
    pub fn new(
        sampler_type: SamplerType,
        num_samples: u32,
        num_sets: usize,
        mut rng: StdRng,
    ) -> Self {
        let requested = (num_samples as usize).max(1);
        let num_sets = num_sets.max(1);
        let grid = grid_dimension(requested);
        let num_samples = if sampler_type.is_grid() {
            grid * grid
        } else {
            requested
        };

        let mut samples = Vec::with_capacity(num_sets * num_samples);
        for _ in 0..num_sets {
            match sampler_type {
                SamplerType::Random => {
                    for _ in 0..num_samples {
                        samples.push(Vec2::new(unit(rng.gen()), unit(rng.gen())));
                    }
                }
                SamplerType::Jittered => {
                    let n = grid as f32;
                    for j in 0..grid {
                        for k in 0..grid {
                            let x = (k as f32 + rng.gen::<f32>()) / n;
                            let y = (j as f32 + rng.gen::<f32>()) / n;
                            samples.push(Vec2::new(unit(x), unit(y)));
                        }
                    }
                }
                SamplerType::Hammersley => {
                    for j in 0..num_samples {
                        samples.push(Vec2::new(
                            j as f32 / num_samples as f32,
                            radical_inverse_2(j as u32),
                        ));
                    }
                }
                SamplerType::Regular => {
                    let n = grid as f32;
                    for j in 0..grid {
                        for k in 0..grid {
                            samples.push(Vec2::new((k as f32 + 0.5) / n, (j as f32 + 0.5) / n));
                        }
                    }
                }
            }
        }

        let mut indices: Vec<usize> = (0..num_samples).collect();
        let mut shuffled_indices = Vec::with_capacity(num_sets * num_samples);
        for _ in 0..num_sets {
            indices.shuffle(&mut rng);
            shuffled_indices.extend_from_slice(&indices);
        }

        log::trace!(
            "Built {} sampler: {} sets of {} points",
            sampler_type,
            num_sets,
            num_samples
        );

        Self {
            sampler_type,
            num_samples,
            num_sets,
            samples,
            shuffled_indices,
            count: 0,
            jump: 0,
            rng,
        }
    }

    /// Builds the sampler described by `settings`, with [`DEFAULT_NUM_SETS`] sets.
    ///
    /// A configured seed makes the sampler reproducible; otherwise it is seeded
    /// from the operating system.
    pub fn from_settings(settings: &BakeSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(
            settings.sampler_type,
            settings.num_samples,
            DEFAULT_NUM_SETS,
            rng,
        )
    }

    /// Returns the next sample point.
    pub fn sample(&mut self) -> Vec2 {
        if self.count % self.num_samples == 0 {
            self.jump = self.rng.gen_range(0..self.num_sets) * self.num_samples;
        }
        let slot = self.jump + self.count % self.num_samples;
        let point = self.samples[self.jump + self.shuffled_indices[slot]];
        self.count = self.count.wrapping_add(1);
        point
    }

    /// Returns the next three sample points, in order.
    pub fn sample_triple(&mut self) -> [Vec2; 3] {
        [self.sample(), self.sample(), self.sample()]
    }

    /// The strategy this sampler was built with.
    pub fn sampler_type(&self) -> SamplerType {
        self.sampler_type
    }

    /// The effective number of points per set.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// The number of sets.
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// The points of one set, in generation order.
    pub fn set(&self, index: usize) -> Option<&[Vec2]> {
        let start = index.checked_mul(self.num_samples)?;
        self.samples.get(start..start + self.num_samples)
    }
}

/// `floor(sqrt(n))`, exact for every `usize` a sample count can take.
fn grid_dimension(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root.max(1)
}

#[inline]
fn unit(v: f32) -> f32 {
    v.clamp(0.0, ONE_MINUS_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(sampler_type: SamplerType, num_samples: u32) -> Sampler {
        Sampler::new(
            sampler_type,
            num_samples,
            DEFAULT_NUM_SETS,
            StdRng::seed_from_u64(0x5eed),
        )
    }

    #[test]
    fn test_radical_inverse_first_values() {
        let expected = [0.0, 0.5, 0.25, 0.75, 0.125, 0.625, 0.375, 0.875];
        for (j, e) in expected.iter().enumerate() {
            assert_eq!(radical_inverse_2(j as u32), *e, "radical_inverse_2({j})");
        }
    }

    #[test]
    fn test_grid_samplers_round_down_to_square() {
        assert_eq!(seeded(SamplerType::Regular, 10).num_samples(), 9);
        assert_eq!(seeded(SamplerType::Jittered, 128).num_samples(), 121);
        assert_eq!(seeded(SamplerType::Hammersley, 10).num_samples(), 10);
        assert_eq!(seeded(SamplerType::Random, 3).num_samples(), 3);
        assert_eq!(grid_dimension(3), 1);
        assert_eq!(grid_dimension(16), 4);
    }

    #[test]
    fn test_regular_yields_grid_centres() {
        let mut sampler = seeded(SamplerType::Regular, 9);
        let mut points: Vec<(f32, f32)> = (0..9)
            .map(|_| {
                let p = sampler.sample();
                (p.x, p.y)
            })
            .collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut expected = Vec::new();
        for k in 0..3 {
            for j in 0..3 {
                expected.push(((k as f32 + 0.5) / 3.0, (j as f32 + 0.5) / 3.0));
            }
        }
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(points, expected);
    }

    #[test]
    fn test_jittered_points_stay_in_their_cell() {
        let sampler = seeded(SamplerType::Jittered, 16);
        for set in 0..sampler.num_sets() {
            let points = sampler.set(set).unwrap();
            for (i, p) in points.iter().enumerate() {
                let (j, k) = (i / 4, i % 4);
                assert!(p.x >= k as f32 / 4.0 && p.x <= (k + 1) as f32 / 4.0);
                assert!(p.y >= j as f32 / 4.0 && p.y <= (j + 1) as f32 / 4.0);
            }
        }
    }

    #[test]
    fn test_hammersley_set_layout() {
        let sampler = seeded(SamplerType::Hammersley, 8);
        let set = sampler.set(5).unwrap();
        for (j, p) in set.iter().enumerate() {
            assert_eq!(p.x, j as f32 / 8.0);
            assert_eq!(p.y, radical_inverse_2(j as u32));
        }
        assert!(sampler.set(DEFAULT_NUM_SETS).is_none());
    }

    #[test]
    fn test_one_set_is_walked_as_a_permutation() {
        let mut sampler = seeded(SamplerType::Hammersley, 16);
        for _ in 0..5 {
            let mut xs: Vec<u32> = (0..16)
                .map(|_| (sampler.sample().x * 16.0) as u32)
                .collect();
            xs.sort_unstable();
            assert_eq!(xs, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_all_points_in_unit_square() {
        for sampler_type in SamplerType::ALL {
            let mut sampler = seeded(sampler_type, 25);
            for _ in 0..1000 {
                let p = sampler.sample();
                assert!(p.in_unit_square(), "{sampler_type}: {p:?}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        for sampler_type in SamplerType::ALL {
            let mut a = seeded(sampler_type, 20);
            let mut b = seeded(sampler_type, 20);
            for _ in 0..200 {
                assert_eq!(a.sample_triple(), b.sample_triple());
            }
        }
    }

    #[test]
    fn test_from_settings_uses_seed() {
        let settings = BakeSettings {
            seed: Some(99),
            sampler_type: SamplerType::Random,
            ..BakeSettings::default()
        };
        let mut a = Sampler::from_settings(&settings);
        let mut b = Sampler::from_settings(&settings);
        assert_eq!(a.num_sets(), DEFAULT_NUM_SETS);
        assert_eq!(a.sample(), b.sample());
    }
}
