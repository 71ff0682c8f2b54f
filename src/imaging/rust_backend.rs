//! Pure Rust image processing backend, no system libraries.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG) | `image` crate, format sniffed from the file contents |
//! | Color normalization | `DynamicImage::to_rgb8` (alpha channel dropped) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Canvas letterbox | `RgbImage::from_pixel` + `image::imageops::replace` |
//! | Encode → PNG | `PngEncoder`, best compression, adaptive row filters |
//! | Encode → JPEG | `jpeg-encoder`, progressive, optimized Huffman tables |
//!
//! ## Transparency
//!
//! Sources are converted to RGB *before* they are placed on the white
//! canvas. `to_rgb8` discards alpha without compositing, so a fully
//! transparent pixel keeps whatever color it stores underneath rather than
//! turning white. Only the letterbox padding is guaranteed white.

use super::backend::{BackendError, Dimensions, ImageBackend, RenderedSizes};
use super::calculations::{center_offset, fit_dimensions, thumbnail_dimensions};
use super::params::{Quality, RenderParams};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgb, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Canvas background behind letterboxed images.
pub const CANVAS_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, e: image::ImageError) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Open an image whose format is detected from its leading bytes.
///
/// The `.png` extension is only a fallback: a JPEG saved under a `.png`
/// name still decodes.
fn open_image(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_image(path)?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Fit an image onto a `width`×`height` white canvas without cropping.
///
/// The source is normalized to RGB, scaled uniformly with Lanczos3 (same
/// filter for enlargement and reduction) and pasted centered.
pub fn fit_to_canvas(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    let rgb = img.to_rgb8();
    let (fit_w, fit_h) = fit_dimensions(rgb.dimensions(), (width, height));
    let resized = image::imageops::resize(&rgb, fit_w, fit_h, FilterType::Lanczos3);

    let (x, y) = center_offset((width, height), (fit_w, fit_h));
    let mut canvas = RgbImage::from_pixel(width, height, CANVAS_BACKGROUND);
    image::imageops::replace(&mut canvas, &resized, x as i64, y as i64);
    canvas
}

/// Scale a canvas to a fixed width, preserving its aspect ratio.
pub fn scale_to_width(canvas: &RgbImage, width: u32) -> RgbImage {
    let (w, h) = thumbnail_dimensions(canvas.dimensions(), width);
    image::imageops::resize(canvas, w, h, FilterType::Lanczos3)
}

fn encode_error(path: &Path, message: impl std::fmt::Display) -> BackendError {
    BackendError::Encode {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Encode and save as PNG with the smallest lossless output the encoder offers.
fn save_png(img: &RgbImage, path: &Path) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new_with_quality(&mut writer, CompressionType::Best, PngFilter::Adaptive)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| encode_error(path, e))?;
    writer.flush()?;
    Ok(())
}

/// Encode and save as a progressive JPEG.
fn save_jpeg(img: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let width = u16::try_from(img.width())
        .map_err(|_| encode_error(path, format!("width {} exceeds JPEG limit", img.width())))?;
    let height = u16::try_from(img.height())
        .map_err(|_| encode_error(path, format!("height {} exceeds JPEG limit", img.height())))?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = jpeg_encoder::Encoder::new(&mut writer, quality.value() as u8);
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(img.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| encode_error(path, e))?;
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_image(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<RenderedSizes, BackendError> {
        let img = load_image(&params.source)?;
        let source = Dimensions::new(img.width(), img.height());

        let canvas = fit_to_canvas(&img, params.canvas_width, params.canvas_height);
        save_png(&canvas, &params.canvas_output)?;

        let thumb = scale_to_width(&canvas, params.thumbnail_width);
        save_jpeg(&thumb, &params.thumbnail_output, params.thumbnail_quality)?;

        Ok(RenderedSizes {
            source,
            canvas: Dimensions::new(canvas.width(), canvas.height()),
            thumbnail: Dimensions::new(thumb.width(), thumb.height()),
        })
    }
}
