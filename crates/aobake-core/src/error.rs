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

//! Defines the hierarchy of error types for the baker.
//!
//! Every failure is reported once at the boundary of the bake call. Rendering
//! is deterministic given the sampler state, so nothing here is retried.

use crate::renderer::SurfaceId;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised by a [`SurfaceDevice`](crate::renderer::SurfaceDevice).
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The handle does not name a live surface (never acquired, or already released).
    #[error("Invalid surface handle: {0:?}")]
    InvalidHandle(SurfaceId),
    /// Two surfaces involved in one operation have different sizes.
    #[error("Surface size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        /// The size the operation required.
        expected: (u32, u32),
        /// The size that was supplied.
        actual: (u32, u32),
    },
    /// A zero-sized surface was requested.
    #[error("Cannot acquire a surface of size {width}x{height}")]
    ZeroSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// An error originating from the backend implementation.
    #[error("Backend-specific surface error: {0}")]
    Backend(String),
}

/// An error raised while loading bake settings from disk or text.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read settings from '{path}': {source}")]
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings text is not valid RON for [`BakeSettings`](crate::BakeSettings).
    #[error("Invalid settings format: {0}")]
    Parse(String),
}

/// The top-level error returned by a bake.
#[derive(Debug, Error)]
pub enum BakeError {
    /// A kernel required by the bake could not be resolved.
    #[error("Kernel missing: '{name}'")]
    MissingKernel {
        /// The registry name that was looked up.
        name: String,
    },
    /// There was nothing to bake (no target, or no batches).
    #[error("Nothing to bake: {0}")]
    EmptyInput(&'static str),
    /// A vertex group was pushed past its fixed capacity.
    #[error("Vertex group capacity of {capacity} vertices exceeded")]
    CapacityOverflow {
        /// The fixed capacity of the group.
        capacity: usize,
    },
    /// A surface operation failed.
    #[error("Surface operation failed: {0}")]
    Surface(#[from] SurfaceError),
    /// A kernel reported a failure while drawing.
    #[error("Kernel execution failed: {0}")]
    Kernel(String),
    /// Settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_kernel_display() {
        let err = BakeError::MissingKernel {
            name: "ao/bake".into(),
        };
        assert_eq!(format!("{err}"), "Kernel missing: 'ao/bake'");
    }

    #[test]
    fn test_bake_error_wraps_surface_error() {
        let err: BakeError = SurfaceError::InvalidHandle(SurfaceId(7)).into();
        assert_eq!(
            format!("{err}"),
            "Surface operation failed: Invalid surface handle: SurfaceId(7)"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_keeps_io_source() {
        let err = ConfigError::Io {
            path: PathBuf::from("missing.ron"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        let message = err.to_string();
        assert!(message.starts_with("Failed to read settings"));
        assert!(message.contains("missing.ron"));
    }
}
