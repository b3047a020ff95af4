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

use aobake_core::math::Vec4;
use aobake_core::BakeError;

/// Maximum number of vertices a single occlusion draw can receive.
///
/// A multiple of three, so a full group always holds whole triangles.
pub const VERTEX_GROUP_CAPACITY: usize = 999;

/// A fixed-capacity list of homogeneous local-space vertices, three per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGroup {
    vertices: Vec<Vec4>,
}

impl VertexGroup {
    /// Creates an empty group with its full capacity reserved.
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(VERTEX_GROUP_CAPACITY),
        }
    }

    /// Appends one triangle.
    ///
    /// Fails with [`BakeError::CapacityOverflow`] when the triangle does not fit.
    pub fn push_triangle(&mut self, triangle: [Vec4; 3]) -> Result<(), BakeError> {
        if self.vertices.len() + 3 > VERTEX_GROUP_CAPACITY {
            return Err(BakeError::CapacityOverflow {
                capacity: VERTEX_GROUP_CAPACITY,
            });
        }
        self.vertices.extend_from_slice(&triangle);
        Ok(())
    }

    /// Number of vertices held.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the group holds no vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` once the group can take no further triangle.
    pub fn is_full(&self) -> bool {
        self.vertices.len() + 3 > VERTEX_GROUP_CAPACITY
    }

    /// The vertices, three per triangle.
    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    /// The vertices as raw bytes, laid out as tightly packed `vec4<f32>`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: [Vec4; 3] = [Vec4::W, Vec4::W, Vec4::W];

    #[test]
    fn test_fills_to_capacity_then_overflows() {
        let mut group = VertexGroup::new();
        for _ in 0..VERTEX_GROUP_CAPACITY / 3 {
            assert!(!group.is_full());
            group.push_triangle(TRI).unwrap();
        }
        assert!(group.is_full());
        assert_eq!(group.len(), VERTEX_GROUP_CAPACITY);

        match group.push_triangle(TRI) {
            Err(BakeError::CapacityOverflow { capacity }) => assert_eq!(capacity, 999),
            other => panic!("expected CapacityOverflow, got {other:?}"),
        }
        assert_eq!(group.len(), VERTEX_GROUP_CAPACITY);
    }

    #[test]
    fn test_as_bytes_is_packed_vec4() {
        let mut group = VertexGroup::new();
        group.push_triangle(TRI).unwrap();
        assert_eq!(group.as_bytes().len(), 3 * 16);
    }
}
