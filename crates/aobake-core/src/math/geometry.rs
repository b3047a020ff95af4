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

//! Provides the axis-aligned bounding box used for bake culling.

use super::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// Batches whose world-space box does not touch the bake target's box are
/// culled before rendering starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An invalid `Aabb`, neutral for merging.
    pub const INVALID: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points in any order.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Creates an `Aabb` that tightly encloses a given set of points.
    ///
    /// Returns `None` if the input is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let aabb = points.into_iter().fold(Self::INVALID, |acc, p| Self {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        });
        aabb.is_valid().then_some(aabb)
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents of the `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Checks if the `Aabb` is valid (i.e., `min` <= `max` on all axes).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if this `Aabb` intersects with another `Aabb`.
    ///
    /// Boxes that only touch at the boundary are considered to be intersecting.
    #[inline]
    pub fn intersects_aabb(&self, other: &Aabb) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }

    /// Returns a copy grown by `margin` on every side.
    #[inline]
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Computes the bounding box that encloses this `Aabb` after an affine transformation.
    ///
    /// The center is transformed directly and the extents are projected onto the
    /// absolute values of the matrix's basis columns.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point(self.center());
        let h = self.half_extents();
        let axis = |i: usize| matrix.cols[i].truncate().abs();
        let half = axis(0) * h.x + axis(1) * h.y + axis(2) * h.z;
        Self::from_center_half_extents(center, half)
    }
}

impl Default for Aabb {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let none: [Vec3; 0] = [];
        assert!(Aabb::from_points(&none).is_none());

        let points = [
            Vec3::new(1.0, 5.0, -1.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(4.0, 8.0, 0.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::splat(2.0));
        let touching = Aabb::from_min_max(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        let apart = Aabb::from_min_max(Vec3::new(2.1, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        assert!(a.intersects_aabb(&touching));
        assert!(touching.intersects_aabb(&a));
        assert!(!a.intersects_aabb(&apart));
        assert!(a.expanded(0.2).intersects_aabb(&apart));
    }

    #[test]
    fn test_aabb_transform_translation_and_scale() {
        let unit = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::ONE);
        let moved = unit.transform(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(11.0, 1.0, 1.0));

        let scaled = unit.transform(&Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5)));
        assert_eq!(scaled.min, Vec3::new(-2.0, -1.0, -0.5));
        assert_eq!(scaled.max, Vec3::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn test_invalid_default() {
        assert!(!Aabb::default().is_valid());
    }
}
