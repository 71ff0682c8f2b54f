//! # Wallpaper Gallery
//!
//! Turns a folder of source images into device-ready wallpapers and a JSON
//! catalog for a static website. One invocation reads every source once,
//! writes the resized images and `index.json`, and exits.
//!
//! # Pipeline
//!
//! ```text
//! 1. Prepare   docs/gallery/{thumbs,<device>}/      (create output tree)
//! 2. Render    gallery-src/<device>/*.png  →  <device>/<slug>.png + thumbs/<slug>.jpg
//! 3. Catalog   one entry per rendered image, device order then filename order
//! 4. Emit      docs/gallery/index.json
//! ```
//!
//! Every run reprocesses all inputs and overwrites previous outputs; there
//! is no cache and no diffing against earlier builds.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`build`] | The pipeline: directory preparation, per-device rendering, manifest emission |
//! | [`catalog`] | Catalog entries, the manifest, and public URL construction |
//! | [`config`] | `gallery.toml` loading, defaults, merging and validation |
//! | [`naming`] | Filename → slug and slug → title |
//! | [`imaging`] | Pure-Rust canvas fit, thumbnails, PNG/JPEG encoding |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Letterbox, Never Crop
//!
//! Wallpapers are scaled to fit the device screen entirely and centered on a
//! white canvas. The full artwork is always visible; the canvas is always
//! exactly the device resolution.
//!
//! ## Explicit Configuration
//!
//! Device profiles, catalog defaults and the site base URL travel through
//! the pipeline as a [`config::GalleryConfig`] and a [`catalog::SiteBase`],
//! never as globals. Tests inject their own profiles and base URL.
//!
//! ## Deterministic Output
//!
//! Per-file work runs in parallel, but results are collected in source
//! order, so re-running on unchanged inputs yields the same `index.json`
//! apart from the `updated` date.

pub mod build;
pub mod catalog;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
