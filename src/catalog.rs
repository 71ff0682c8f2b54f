//! Catalog entries and the `index.json` manifest.
//!
//! The manifest is the public contract of the gallery: clients download
//! `index.json`, list the entries and fetch `preview_url`/`download_url`.
//! Field order in the structs below is the key order on disk.
//!
//! ```json
//! {
//!   "updated": "2026-10-19",
//!   "items": [
//!     {
//!       "id": "my-photo-01",
//!       "title": "My Photo 01",
//!       "author": "",
//!       "license": "CC0",
//!       "device": "paperpro",
//!       "resolution": "2160x1620",
//!       "preview_url": "https://owner.github.io/project/gallery/thumbs/my-photo-01.jpg",
//!       "download_url": "https://owner.github.io/project/gallery/paperpro/my-photo-01.png",
//!       "tags": []
//!     }
//!   ]
//! }
//! ```

use crate::config::{CatalogConfig, DeviceProfile};
use crate::naming::title_from_slug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides every other base URL source.
pub const BASE_URL_ENV: &str = "GALLERY_BASE_URL";
/// `<owner>/<project>` deployment identity, as set by GitHub Actions.
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";
/// Repository used when no deployment identity is available.
const PLACEHOLDER_REPOSITORY: (&str, &str) = ("user", "repo");

/// One published wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub license: String,
    pub device: String,
    pub resolution: String,
    pub preview_url: String,
    pub download_url: String,
    pub tags: Vec<String>,
}

impl CatalogEntry {
    /// Build the entry for `slug` rendered for `device`.
    pub fn new(
        slug: &str,
        device: &DeviceProfile,
        catalog: &CatalogConfig,
        base: &SiteBase,
    ) -> Self {
        Self {
            id: slug.to_string(),
            title: title_from_slug(slug),
            author: catalog.author.clone(),
            license: catalog.license.clone(),
            device: device.name.clone(),
            resolution: device.resolution(),
            preview_url: base.preview_url(slug),
            download_url: base.download_url(&device.name, slug),
            tags: Vec::new(),
        }
    }
}

/// The full catalog written to `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Build date, `YYYY-MM-DD` (UTC).
    pub updated: String,
    pub items: Vec<CatalogEntry>,
}

impl Manifest {
    pub fn new(updated: impl Into<String>, items: Vec<CatalogEntry>) -> Self {
        Self {
            updated: updated.into(),
            items,
        }
    }
}

/// Today's date in UTC, formatted for [`Manifest::updated`].
pub fn today_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Write the manifest as pretty-printed JSON, replacing any existing file.
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), std::io::Error> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    std::fs::write(path, json)
}

/// Read a manifest previously written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Manifest, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Public root URL of the deployed site, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBase(String);

impl SiteBase {
    pub fn new(url: &str) -> Self {
        Self(url.trim_end_matches('/').to_string())
    }

    /// Base for a GitHub Pages project site: `https://<owner>.github.io/<project>`.
    pub fn github_pages(owner: &str, project: &str) -> Self {
        Self::new(&format!("https://{owner}.github.io/{project}"))
    }

    /// Pick the base URL. First non-blank source wins:
    ///
    /// 1. `override_url` (the `GALLERY_BASE_URL` environment variable)
    /// 2. `configured` (`site.base_url` in `gallery.toml`)
    /// 3. `repository` (`GITHUB_REPOSITORY`, `<owner>/<project>`)
    /// 4. `https://user.github.io/repo`
    pub fn resolve(
        override_url: Option<&str>,
        configured: Option<&str>,
        repository: Option<&str>,
    ) -> Self {
        let explicit = [override_url, configured]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty());
        if let Some(url) = explicit {
            return Self::new(url);
        }

        let (owner, project) = repository
            .map(str::trim)
            .and_then(|repo| repo.split_once('/'))
            .filter(|(owner, project)| !owner.is_empty() && !project.is_empty())
            .unwrap_or(PLACEHOLDER_REPOSITORY);
        Self::github_pages(owner, project)
    }

    /// Resolve from the process environment plus the configured value.
    pub fn from_env(configured: Option<&str>) -> Self {
        let override_url = std::env::var(BASE_URL_ENV).ok();
        let repository = std::env::var(REPOSITORY_ENV).ok();
        Self::resolve(
            override_url.as_deref(),
            configured,
            repository.as_deref(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn preview_url(&self, slug: &str) -> String {
        format!("{}/gallery/thumbs/{slug}.jpg", self.0)
    }

    pub fn download_url(&self, device: &str, slug: &str) -> String {
        format!("{}/gallery/{device}/{slug}.png", self.0)
    }
}
