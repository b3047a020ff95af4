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

//! Name-based lookup of the kernels a bake needs.

use crate::renderer::{BlendKernel, OcclusionKernel};
use crate::BakeError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry name of the occlusion kernel.
pub const OCCLUSION_KERNEL: &str = "ao/bake";
/// Registry name of the blend/dilate kernel.
pub const BLEND_KERNEL: &str = "ao/mix";

/// Resolves kernels by name.
///
/// A host registers its kernels once; a bake resolves both before allocating
/// anything and fails with [`BakeError::MissingKernel`] if either is absent.
#[derive(Default, Clone)]
pub struct KernelRegistry {
    occlusion: HashMap<String, Arc<dyn OcclusionKernel>>,
    blend: HashMap<String, Arc<dyn BlendKernel>>,
}

impl KernelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an occlusion kernel, replacing any previous one with the same name.
    pub fn register_occlusion(
        &mut self,
        name: impl Into<String>,
        kernel: Arc<dyn OcclusionKernel>,
    ) -> &mut Self {
        self.occlusion.insert(name.into(), kernel);
        self
    }

    /// Registers a blend kernel, replacing any previous one with the same name.
    pub fn register_blend(
        &mut self,
        name: impl Into<String>,
        kernel: Arc<dyn BlendKernel>,
    ) -> &mut Self {
        self.blend.insert(name.into(), kernel);
        self
    }

    /// Resolves an occlusion kernel by name.
    pub fn occlusion(&self, name: &str) -> Result<Arc<dyn OcclusionKernel>, BakeError> {
        self.occlusion
            .get(name)
            .cloned()
            .ok_or_else(|| BakeError::MissingKernel {
                name: name.to_owned(),
            })
    }

    /// Resolves a blend kernel by name.
    pub fn blend(&self, name: &str) -> Result<Arc<dyn BlendKernel>, BakeError> {
        self.blend
            .get(name)
            .cloned()
            .ok_or_else(|| BakeError::MissingKernel {
                name: name.to_owned(),
            })
    }
}

impl fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut occlusion: Vec<_> = self.occlusion.keys().collect();
        let mut blend: Vec<_> = self.blend.keys().collect();
        occlusion.sort();
        blend.sort();
        f.debug_struct("KernelRegistry")
            .field("occlusion", &occlusion)
            .field("blend", &blend)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{OcclusionDraw, SurfaceDevice, SurfaceId};

    struct NoopKernel;

    impl OcclusionKernel for NoopKernel {
        fn draw(
            &self,
            _device: &mut dyn SurfaceDevice,
            _output: SurfaceId,
            _draw: &OcclusionDraw<'_>,
        ) -> Result<(), BakeError> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_kernel_names_the_lookup() {
        let registry = KernelRegistry::new();
        match registry.blend(BLEND_KERNEL) {
            Err(BakeError::MissingKernel { name }) => assert_eq!(name, "ao/mix"),
            other => panic!("expected MissingKernel, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = KernelRegistry::new();
        registry.register_occlusion(OCCLUSION_KERNEL, Arc::new(NoopKernel));
        assert!(registry.occlusion(OCCLUSION_KERNEL).is_ok());
        assert!(registry.occlusion("ao/other").is_err());
        assert!(format!("{registry:?}").contains("ao/bake"));
    }
}
