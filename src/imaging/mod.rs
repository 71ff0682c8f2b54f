//! Image processing in pure Rust (`image` plus `jpeg-encoder`).
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Canvas fit** | Lanczos3 resize, centered on a white canvas → PNG |
//! | **Thumbnail** | Lanczos3 resize to a fixed width → progressive JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Output naming per slug, then a backend call

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RenderedSizes};
pub use calculations::{center_offset, fit_dimensions, thumbnail_dimensions};
pub use operations::{CanvasTarget, RenderedWallpaper, ThumbnailConfig, render_wallpaper};
pub use params::{Quality, RenderParams};
pub use rust_backend::RustBackend;
