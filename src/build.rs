//! The gallery build: source directories in, device images + `index.json` out.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── gallery-src/
//! │   ├── paperpro/*.png          # One directory per device
//! │   └── rm2/*.png
//! └── docs/gallery/
//!     ├── index.json              # Manifest
//!     ├── thumbs/<slug>.jpg       # Shared across devices
//!     ├── paperpro/<slug>.png     # Canvas-fitted, 2160x1620
//!     └── rm2/<slug>.png          # Canvas-fitted, 1404x1872
//! ```
//!
//! ## Ordering
//!
//! Devices are processed one after another in configuration order. Within a
//! device, files are rendered in parallel with [rayon](https://docs.rs/rayon)
//! but collected back in filename order, so the manifest is identical to a
//! sequential run. Progress events for a device are sent once its images
//! are collected, in the same order. Files whose names collapse to the same slug are rendered
//! sequentially in filename order within one worker: the last one wins the
//! output files, and every one of them keeps its catalog entry.
//!
//! Thumbnails live in one shared directory, so a slug present for several
//! devices ends up with the thumbnail of the last device processed.
//!
//! ## Failures
//!
//! A missing device source directory means zero images for that device.
//! Filesystem and encode errors abort the build. Decode errors abort too
//! unless `processing.on_decode_error = "skip"`, in which case the image is
//! logged, reported and left out of the catalog. An aborted build writes no
//! manifest.

use crate::catalog::{CatalogEntry, Manifest, SiteBase, write_manifest};
use crate::config::{DecodeErrorPolicy, DeviceProfile, GalleryConfig};
use crate::imaging::{
    BackendError, CanvasTarget, Dimensions, ImageBackend, Quality, ThumbnailConfig,
    render_wallpaper,
};
use crate::naming::source_slug;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Source tree, relative to the project root.
pub const SOURCE_DIR: &str = "gallery-src";
/// Output tree, relative to the project root.
pub const OUTPUT_DIR: &str = "docs/gallery";
/// Shared thumbnail directory inside the output tree.
pub const THUMBS_DIR: &str = "thumbs";
pub const MANIFEST_FILE: &str = "index.json";
/// Only files with this exact (case-sensitive) suffix are sources.
pub const SOURCE_EXTENSION: &str = ".png";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to process {}: {source}", .path.display())]
    Imaging {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Output paths under `<root>/docs/gallery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub thumbs: PathBuf,
}

impl OutputLayout {
    pub fn new(project_root: &Path) -> Self {
        let root = project_root.join(OUTPUT_DIR);
        let thumbs = root.join(THUMBS_DIR);
        Self { root, thumbs }
    }

    pub fn device_dir(&self, device: &str) -> PathBuf {
        self.root.join(device)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }
}

/// `<root>/gallery-src/<device>`.
pub fn source_dir(project_root: &Path, device: &str) -> PathBuf {
    project_root.join(SOURCE_DIR).join(device)
}

/// Create the output root, the thumbnail directory and one directory per
/// device. Existing directories are left alone.
pub fn prepare_dirs(layout: &OutputLayout, devices: &[DeviceProfile]) -> std::io::Result<()> {
    std::fs::create_dir_all(&layout.root)?;
    std::fs::create_dir_all(&layout.thumbs)?;
    for device in devices {
        std::fs::create_dir_all(layout.device_dir(&device.name))?;
    }
    Ok(())
}

/// Source images directly inside `dir`, sorted by file name.
///
/// Only regular files ending in `.png` (exact case) count. A missing
/// directory yields an empty list.
pub fn list_sources(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut sources: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SOURCE_EXTENSION))
        })
        .collect();
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sources)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Progress notifications for the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    DeviceStarted {
        device: String,
        resolution: String,
        image_count: usize,
        /// False when the device has no source directory.
        source_found: bool,
    },
    ImageRendered {
        device: String,
        /// 1-based position in filename order.
        index: usize,
        source_name: String,
        slug: String,
        source_size: Dimensions,
    },
    ImageSkipped {
        device: String,
        index: usize,
        source_name: String,
        reason: String,
    },
}

/// A source image left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub device: String,
    pub source: PathBuf,
    pub reason: String,
}

/// Catalog entries and skips for one device, in filename order.
#[derive(Debug, Default)]
pub struct DeviceOutcome {
    pub entries: Vec<CatalogEntry>,
    pub skipped: Vec<SkippedImage>,
}

enum ItemOutcome {
    Rendered {
        entry: CatalogEntry,
        source_size: Dimensions,
    },
    Skipped(SkippedImage),
}

/// Shared, read-only inputs to every render.
#[derive(Debug, Clone)]
pub struct BuildSettings<'a> {
    pub config: &'a GalleryConfig,
    pub base: &'a SiteBase,
}

impl BuildSettings<'_> {
    fn thumbnails(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            width: self.config.thumbnails.width,
            quality: Quality::new(self.config.thumbnails.quality),
        }
    }
}

/// Group source indices by slug, keeping filename order inside each group.
fn group_by_slug(slugs: &[String]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut by_slug: HashMap<&str, usize> = HashMap::new();
    for (i, slug) in slugs.iter().enumerate() {
        match by_slug.get(slug.as_str()) {
            Some(&group) => groups[group].push(i),
            None => {
                by_slug.insert(slug, groups.len());
                groups.push(vec![i]);
            }
        }
    }
    groups
}

/// Render every source of one device and build its catalog entries.
pub fn process_device(
    backend: &impl ImageBackend,
    device: &DeviceProfile,
    source_dir: &Path,
    layout: &OutputLayout,
    settings: &BuildSettings<'_>,
    events: Option<&Sender<BuildEvent>>,
) -> Result<DeviceOutcome, BuildError> {
    let source_found = source_dir.is_dir();
    let sources = list_sources(source_dir)?;
    if let Some(tx) = events {
        tx.send(BuildEvent::DeviceStarted {
            device: device.name.clone(),
            resolution: device.resolution(),
            image_count: sources.len(),
            source_found,
        })
        .ok();
    }
    if !source_found {
        debug!(device = %device.name, dir = %source_dir.display(), "no source directory, skipping");
        return Ok(DeviceOutcome::default());
    }

    let names: Vec<String> = sources.iter().map(|p| file_name(p)).collect();
    let slugs: Vec<String> = names.iter().map(|n| source_slug(n)).collect();
    let groups = group_by_slug(&slugs);
    for group in groups.iter().filter(|g| g.len() > 1) {
        let colliding: Vec<&str> = group.iter().map(|&i| names[i].as_str()).collect();
        warn!(
            device = %device.name,
            slug = %slugs[group[0]],
            files = ?colliding,
            "slug collision, later files overwrite earlier outputs"
        );
    }

    let thumbnails = settings.thumbnails();
    let canvas_dir = layout.device_dir(&device.name);
    let policy = settings.config.processing.on_decode_error;

    let render_one = |i: usize| -> Result<ItemOutcome, BuildError> {
        let source = &sources[i];
        let slug = &slugs[i];
        let target = CanvasTarget {
            output_dir: &canvas_dir,
            width: device.width,
            height: device.height,
        };
        match render_wallpaper(backend, source, slug, target, &layout.thumbs, &thumbnails) {
            Ok(rendered) => {
                debug!(
                    device = %device.name,
                    source = %names[i],
                    output = %rendered.canvas_path.display(),
                    "rendered"
                );
                Ok(ItemOutcome::Rendered {
                    entry: CatalogEntry::new(slug, device, &settings.config.catalog, settings.base),
                    source_size: rendered.sizes.source,
                })
            }
            Err(e) if e.is_decode() && policy == DecodeErrorPolicy::Skip => {
                warn!(device = %device.name, source = %names[i], error = %e, "skipping undecodable image");
                Ok(ItemOutcome::Skipped(SkippedImage {
                    device: device.name.clone(),
                    source: source.clone(),
                    reason: e.to_string(),
                }))
            }
            Err(e) => Err(BuildError::Imaging {
                path: source.clone(),
                source: e,
            }),
        }
    };

    let grouped: Vec<Vec<(usize, ItemOutcome)>> = groups
        .par_iter()
        .map(|group| {
            group
                .iter()
                .map(|&i| render_one(i).map(|outcome| (i, outcome)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut ordered: Vec<(usize, ItemOutcome)> = grouped.into_iter().flatten().collect();
    ordered.sort_by_key(|(i, _)| *i);

    // Events go out in filename order, not completion order.
    let mut outcome = DeviceOutcome::default();
    for (i, item) in ordered {
        let event = match item {
            ItemOutcome::Rendered { entry, source_size } => {
                let event = BuildEvent::ImageRendered {
                    device: device.name.clone(),
                    index: i + 1,
                    source_name: names[i].clone(),
                    slug: entry.id.clone(),
                    source_size,
                };
                outcome.entries.push(entry);
                event
            }
            ItemOutcome::Skipped(skip) => {
                let event = BuildEvent::ImageSkipped {
                    device: device.name.clone(),
                    index: i + 1,
                    source_name: names[i].clone(),
                    reason: skip.reason.clone(),
                };
                outcome.skipped.push(skip);
                event
            }
        };
        if let Some(tx) = events {
            tx.send(event).ok();
        }
    }
    Ok(outcome)
}

/// Result of a full build.
#[derive(Debug)]
pub struct BuildResult {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub skipped: Vec<SkippedImage>,
}

/// Run the whole pipeline for `project_root` and write `index.json`.
///
/// `updated` is stored verbatim as the manifest date.
pub fn build(
    backend: &impl ImageBackend,
    project_root: &Path,
    settings: &BuildSettings<'_>,
    updated: &str,
    events: Option<&Sender<BuildEvent>>,
) -> Result<BuildResult, BuildError> {
    let layout = OutputLayout::new(project_root);
    prepare_dirs(&layout, &settings.config.devices)?;

    let mut items = Vec::new();
    let mut skipped = Vec::new();
    for device in &settings.config.devices {
        let dir = source_dir(project_root, &device.name);
        let outcome = process_device(backend, device, &dir, &layout, settings, events)?;
        items.extend(outcome.entries);
        skipped.extend(outcome.skipped);
    }

    let manifest = Manifest::new(updated, items);
    let manifest_path = layout.manifest_path();
    write_manifest(&manifest_path, &manifest)?;
    info!(
        path = %manifest_path.display(),
        items = manifest.items.len(),
        skipped = skipped.len(),
        "manifest written"
    );

    Ok(BuildResult {
        manifest,
        manifest_path,
        skipped,
    })
}

/// A source image as the build would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub source: PathBuf,
    pub slug: String,
    /// `None` when the file cannot be identified as an image.
    pub dimensions: Option<Dimensions>,
    /// Another file of the same device maps to the same slug.
    pub duplicate_slug: bool,
}

/// Sources for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePlan {
    pub device: DeviceProfile,
    pub source_dir: PathBuf,
    pub source_found: bool,
    pub images: Vec<PlannedImage>,
}

/// List what a build would process, without rendering anything.
pub fn plan(
    backend: &impl ImageBackend,
    project_root: &Path,
    config: &GalleryConfig,
) -> Result<Vec<DevicePlan>, BuildError> {
    let mut plans = Vec::with_capacity(config.devices.len());
    for device in &config.devices {
        let dir = source_dir(project_root, &device.name);
        let sources = list_sources(&dir)?;
        let slugs: Vec<String> = sources.iter().map(|p| source_slug(&file_name(p))).collect();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for slug in &slugs {
            *counts.entry(slug.as_str()).or_default() += 1;
        }

        let images = sources
            .iter()
            .zip(&slugs)
            .map(|(source, slug)| PlannedImage {
                source: source.clone(),
                slug: slug.clone(),
                dimensions: backend.identify(source).ok(),
                duplicate_slug: counts[slug.as_str()] > 1,
            })
            .collect();

        plans.push(DevicePlan {
            device: device.clone(),
            source_found: dir.is_dir(),
            source_dir: dir,
            images,
        });
    }
    Ok(plans)
}
