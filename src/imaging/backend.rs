//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and render.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust with no
//! system libraries. Everything is statically linked into the binary.

use super::params::RenderParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
}

impl BackendError {
    /// True when the source image itself could not be read as an image.
    ///
    /// Decode failures are the only per-file errors the build may skip;
    /// I/O and encode failures always abort.
    pub fn is_decode(&self) -> bool {
        matches!(self, BackendError::Decode { .. })
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What a render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedSizes {
    /// Original source dimensions.
    pub source: Dimensions,
    /// Full canvas, always the requested device size.
    pub canvas: Dimensions,
    pub thumbnail: Dimensions,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the source, fit it onto the device canvas, write the canvas
    /// and a thumbnail derived from it.
    fn render(&self, params: &RenderParams) -> Result<RenderedSizes, BackendError>;
}
