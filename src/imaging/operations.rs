//! High-level image operations.
//!
//! These functions turn a slug and a device target into output paths and
//! hand the work to the backend.

use super::backend::{BackendError, ImageBackend, RenderedSizes};
use super::params::{Quality, RenderParams};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 600,
            quality: Quality::default(),
        }
    }
}

/// Target canvas for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasTarget<'a> {
    /// Directory receiving `<slug>.png`.
    pub output_dir: &'a Path,
    pub width: u32,
    pub height: u32,
}

/// Files produced for one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWallpaper {
    pub canvas_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub sizes: RenderedSizes,
}

/// Render one source into `<canvas dir>/<slug>.png` and `<thumb dir>/<slug>.jpg`.
pub fn render_wallpaper(
    backend: &impl ImageBackend,
    source: &Path,
    slug: &str,
    canvas: CanvasTarget<'_>,
    thumbnail_dir: &Path,
    thumbnails: &ThumbnailConfig,
) -> Result<RenderedWallpaper> {
    let params = RenderParams {
        source: source.to_path_buf(),
        canvas_output: canvas.output_dir.join(format!("{slug}.png")),
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        thumbnail_output: thumbnail_dir.join(format!("{slug}.jpg")),
        thumbnail_width: thumbnails.width,
        thumbnail_quality: thumbnails.quality,
    };
    let sizes = backend.render(&params)?;
    Ok(RenderedWallpaper {
        canvas_path: params.canvas_output,
        thumbnail_path: params.thumbnail_output,
        sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::Dimensions;

    #[test]
    fn render_wallpaper_names_outputs_by_slug() {
        let backend = MockBackend::new();
        let rendered = render_wallpaper(
            &backend,
            Path::new("/src/paperpro/My Photo_01.png"),
            "my-photo-01",
            CanvasTarget {
                output_dir: Path::new("/out/paperpro"),
                width: 2160,
                height: 1620,
            },
            Path::new("/out/thumbs"),
            &ThumbnailConfig::default(),
        )
        .unwrap();

        assert_eq!(
            rendered.canvas_path,
            PathBuf::from("/out/paperpro/my-photo-01.png")
        );
        assert_eq!(
            rendered.thumbnail_path,
            PathBuf::from("/out/thumbs/my-photo-01.jpg")
        );
        assert_eq!(rendered.sizes.thumbnail, Dimensions::new(600, 450));

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Render {
                source: "/src/paperpro/My Photo_01.png".to_string(),
                canvas_output: "/out/paperpro/my-photo-01.png".to_string(),
                canvas_width: 2160,
                canvas_height: 1620,
                thumbnail_output: "/out/thumbs/my-photo-01.jpg".to_string(),
                thumbnail_width: 600,
                quality: 82,
            }]
        );
    }

    #[test]
    fn render_wallpaper_propagates_backend_errors() {
        let backend = MockBackend::failing_on(&["bad.png"]);
        let result = render_wallpaper(
            &backend,
            Path::new("/src/bad.png"),
            "bad",
            CanvasTarget {
                output_dir: Path::new("/out/rm2"),
                width: 1404,
                height: 1872,
            },
            Path::new("/out/thumbs"),
            &ThumbnailConfig::default(),
        );
        assert!(result.unwrap_err().is_decode());
    }
}
