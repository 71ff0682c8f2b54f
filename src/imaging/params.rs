//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides file names and sizes) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 82). Clamped on construction.
//! - [`RenderParams`] — Everything needed to render one wallpaper: source, canvas
//!   output and size, thumbnail output, width and quality.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(82)
    }
}

/// Parameters for rendering one source image into a device canvas plus its
/// thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    /// Lossless full-resolution output (PNG).
    pub canvas_output: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Lossy preview output (JPEG).
    pub thumbnail_output: PathBuf,
    /// Thumbnail width; height follows the canvas aspect ratio.
    pub thumbnail_width: u32,
    pub thumbnail_quality: Quality,
}
