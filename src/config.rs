//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults
//! describe the reference build (two devices, CC0 license, 600px JPEG
//! thumbnails); an optional `gallery.toml` in the project root overrides
//! any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── gallery.toml           # Optional overrides
//! ├── gallery-src/           # Source images, one directory per device
//! │   ├── paperpro/
//! │   └── rm2/
//! └── docs/gallery/          # Generated output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [[devices]]               # Processed in the order listed
//! name = "paperpro"
//! width = 2160
//! height = 1620
//!
//! [[devices]]
//! name = "rm2"
//! width = 1404
//! height = 1872
//!
//! [catalog]
//! license = "CC0"           # License stamped on every entry
//! author = ""               # Author stamped on every entry
//!
//! [thumbnails]
//! width = 600               # Thumbnail width in pixels
//! quality = 82              # JPEG quality (1-100)
//!
//! [site]
//! # base_url = "https://example.org/wallpapers"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! on_decode_error = "abort" # "abort" or "skip"
//! ```
//!
//! ## Partial Configuration
//!
//! Tables merge key by key, so overriding one thumbnail setting keeps the
//! rest. The `devices` array is replaced as a whole: listing one device
//! means only that device is built.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::thumbnail_dimensions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
///
/// All fields have defaults matching the reference build. Unknown keys are
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Device profiles, in processing order.
    pub devices: Vec<DeviceProfile>,
    /// Values stamped on every catalog entry.
    pub catalog: CatalogConfig,
    /// Thumbnail size and encoding.
    pub thumbnails: ThumbnailsConfig,
    /// Public URL settings.
    pub site: SiteConfig,
    /// Parallelism and failure policy.
    pub processing: ProcessingConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            devices: vec![
                DeviceProfile::new("paperpro", 2160, 1620),
                DeviceProfile::new("rm2", 1404, 1872),
            ],
            catalog: CatalogConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            site: SiteConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::Validation(
                "at least one device must be configured".into(),
            ));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.is_empty()
                || !device
                    .name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(ConfigError::Validation(format!(
                    "device name '{}' must be non-empty and use only a-z, 0-9 and '-'",
                    device.name
                )));
            }
            if device.name == crate::build::THUMBS_DIR {
                return Err(ConfigError::Validation(format!(
                    "device name '{}' is reserved for thumbnails",
                    device.name
                )));
            }
            if !seen.insert(device.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "device '{}' is listed more than once",
                    device.name
                )));
            }
            if device.width == 0 || device.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "device '{}' resolution must be non-zero",
                    device.name
                )));
            }
        }
        if self.thumbnails.width == 0 || self.thumbnails.width > u16::MAX as u32 {
            return Err(ConfigError::Validation(
                "thumbnails.width must be 1-65535".into(),
            ));
        }
        for device in &self.devices {
            let (_, height) =
                thumbnail_dimensions((device.width, device.height), self.thumbnails.width);
            if height > u16::MAX as u32 {
                return Err(ConfigError::Validation(format!(
                    "device '{}' thumbnail would be {}x{height}, over the 65535 JPEG limit",
                    device.name, self.thumbnails.width
                )));
            }
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// A named target resolution for one hardware model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceProfile {
    /// Identifier used for the source directory, output directory and the
    /// catalog `device` field.
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// `WxH` string used in the catalog.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Catalog entry defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub license: String,
    pub author: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            license: "CC0".to_string(),
            author: String::new(),
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Fixed thumbnail width; height follows the device aspect ratio.
    pub width: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: 600,
            quality: 82,
        }
    }
}

/// Public URL settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Explicit site base URL. When absent the base is derived from the
    /// environment; see [`crate::catalog::SiteBase`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// What to do when a source image cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// Stop the build; no manifest is written.
    #[default]
    Abort,
    /// Log a warning, leave the image out of the catalog and keep going.
    Skip,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
    pub on_decode_error: DecodeErrorPolicy,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallery.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `gallery.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Wallpaper Gallery Configuration
# ===============================
# Place this file as gallery.toml in the project root. Every key is
# optional; anything omitted falls back to the value shown here.

# Device profiles, built in the order listed. Source images are read from
# gallery-src/<name>/*.png and written to docs/gallery/<name>/.
# Listing devices here replaces the whole default list.
[[devices]]
name = "paperpro"
width = 2160
height = 1620

[[devices]]
name = "rm2"
width = 1404
height = 1872

[catalog]
# License and author stamped on every catalog entry.
license = "CC0"
author = ""

[thumbnails]
# Thumbnails keep the device aspect ratio at a fixed width.
width = 600
# JPEG quality (1-100).
quality = 82

[site]
# Public base URL for preview/download links. When unset the base comes
# from GALLERY_BASE_URL, then GITHUB_REPOSITORY (owner/project →
# https://owner.github.io/project), then a placeholder.
# base_url = "https://example.org/wallpapers"

[processing]
# Maximum parallel workers. Omit to use every CPU core.
# max_processes = 4
# What to do with a source image that cannot be decoded:
#   "abort" - stop the build, write no manifest
#   "skip"  - warn, leave it out of the catalog, continue
on_decode_error = "abort"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(toml_str: &str) -> Result<GalleryConfig, ConfigError> {
        resolve_config(stock_defaults_value(), Some(toml::from_str(toml_str)?))
    }

    #[test]
    fn default_config_has_reference_devices() {
        let config = GalleryConfig::default();
        assert_eq!(
            config.devices,
            vec![
                DeviceProfile::new("paperpro", 2160, 1620),
                DeviceProfile::new("rm2", 1404, 1872),
            ]
        );
    }

    #[test]
    fn default_catalog_and_thumbnail_settings() {
        let config = GalleryConfig::default();
        assert_eq!(config.catalog.license, "CC0");
        assert_eq!(config.catalog.author, "");
        assert_eq!(config.thumbnails.width, 600);
        assert_eq!(config.thumbnails.quality, 82);
        assert_eq!(config.site.base_url, None);
        assert_eq!(config.processing.on_decode_error, DecodeErrorPolicy::Abort);
    }

    #[test]
    fn device_resolution_string() {
        assert_eq!(
            DeviceProfile::new("rm2", 1404, 1872).resolution(),
            "1404x1872"
        );
    }

    #[test]
    fn parse_partial_config_keeps_other_defaults() {
        let config = parse("[thumbnails]\nquality = 70\n").unwrap();
        assert_eq!(config.thumbnails.quality, 70);
        assert_eq!(config.thumbnails.width, 600);
        assert_eq!(config.devices.len(), 2);
    }

    #[test]
    fn devices_array_replaces_defaults() {
        let config = parse(
            r#"
[[devices]]
name = "kindle"
width = 1072
height = 1448
"#,
        )
        .unwrap();
        assert_eq!(config.devices, vec![DeviceProfile::new("kindle", 1072, 1448)]);
    }

    #[test]
    fn parse_site_and_processing() {
        let config = parse(
            r#"
[site]
base_url = "https://example.org/walls"

[processing]
max_processes = 2
on_decode_error = "skip"
"#,
        )
        .unwrap();
        assert_eq!(
            config.site.base_url.as_deref(),
            Some("https://example.org/walls")
        );
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.processing.on_decode_error, DecodeErrorPolicy::Skip);
    }

    #[test]
    fn unknown_decode_policy_rejected() {
        assert!(parse("[processing]\non_decode_error = \"retry\"\n").is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[catalog]\nauthor = \"Ada\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.catalog.author, "Ada");
        assert_eq!(config.catalog.license, "CC0");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not [valid toml").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        assert!(parse("colour = \"red\"\n").is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        assert!(parse("[thumbnails]\nheight = 400\n").is_err());
    }

    #[test]
    fn unknown_device_key_rejected() {
        assert!(parse("[[devices]]\nname = \"a\"\nwidth = 1\nheight = 1\ndpi = 300\n").is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_devices() {
        let config = GalleryConfig {
            devices: vec![],
            ..GalleryConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_duplicate_devices() {
        let config = GalleryConfig {
            devices: vec![
                DeviceProfile::new("rm2", 1404, 1872),
                DeviceProfile::new("rm2", 1, 1),
            ],
            ..GalleryConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("more than once"), "{err}");
    }

    #[test]
    fn validate_rejects_unsafe_device_names() {
        for name in ["", "Paper Pro", "../up", "rm_2"] {
            let config = GalleryConfig {
                devices: vec![DeviceProfile::new(name, 10, 10)],
                ..GalleryConfig::default()
            };
            assert!(config.validate().is_err(), "name {name:?} accepted");
        }
    }

    #[test]
    fn validate_rejects_thumbs_as_device_name() {
        let config = GalleryConfig {
            devices: vec![DeviceProfile::new("thumbs", 10, 10)],
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_resolution() {
        let config = GalleryConfig {
            devices: vec![DeviceProfile::new("rm2", 0, 1872)],
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_thumbnail_bounds() {
        let mut config = GalleryConfig::default();
        config.thumbnails.width = 0;
        assert!(config.validate().is_err());
        config.thumbnails.width = 70_000;
        assert!(config.validate().is_err());
        config.thumbnails.width = 600;
        config.thumbnails.quality = 0;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 101;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_thumbnail_taller_than_jpeg_limit() {
        let mut config = GalleryConfig::default();
        config.devices.push(DeviceProfile::new("scroll", 100, 12_000));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scroll"), "{err}");

        // 600 * 10_900 / 100 = 65_400 still fits
        config.devices[2].height = 10_900;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[thumbnails]\nquality = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("a = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("a = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_array().map(|a| a.len()), Some(1));
    }

    // =========================================================================
    // Threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
            ..ProcessingConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
            ..ProcessingConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, GalleryConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for section in ["devices", "catalog", "thumbnails", "site", "processing"] {
            assert!(table.contains_key(section), "missing {section}");
        }
    }
}
