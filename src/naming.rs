//! Filename normalization for generated assets.
//!
//! Every source image is published under a slug derived from its filename.
//! The same slug names the device image (`<device>/<slug>.png`), the shared
//! thumbnail (`thumbs/<slug>.jpg`) and the catalog entry `id`, so the rules
//! here decide every public URL the gallery exposes.
//!
//! ## Slug Rules
//!
//! Applied in order:
//! 1. Strip the final extension (`photo.final.png` → `photo.final`)
//! 2. Runs of whitespace or `_` become a single `-`
//! 3. Drop everything outside `[a-zA-Z0-9-]`
//! 4. Collapse repeated `-`
//! 5. Trim leading/trailing `-`
//! 6. Lowercase
//!
//! - `My Photo_01.PNG` → `my-photo-01`
//! - `Été 2024.png` → `t-2024`
//! - `__draft__.png` → `draft`

use sha2::{Digest, Sha256};

/// Normalize a filename into a URL- and filesystem-safe slug.
///
/// Pure and deterministic; ASCII-only output. May return an empty string
/// when nothing survives the filtering — use [`source_slug`] to get a
/// guaranteed non-empty identifier.
pub fn slugify(filename: &str) -> String {
    let base = strip_extension(filename);

    let mut hyphenated = String::with_capacity(base.len());
    let mut in_separator_run = false;
    for c in base.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_separator_run {
                hyphenated.push('-');
                in_separator_run = true;
            }
        } else {
            in_separator_run = false;
            hyphenated.push(c);
        }
    }

    let mut slug = String::with_capacity(hyphenated.len());
    for c in hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
    {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug.trim_matches('-').to_ascii_lowercase()
}

/// Remove the final `.ext` suffix. A trailing dot with nothing after it is
/// not an extension and is left for the character filter to drop.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => &name[..pos],
        _ => name,
    }
}

/// Slug for a source file, never empty.
///
/// Filenames that slugify to nothing (`.png`, `日本.png`, `---.png`) get
/// `untitled-<hash>`, where `<hash>` is the first 8 hex digits of the
/// SHA-256 of the original filename. Distinct names stay distinct and the
/// same name always maps to the same slug.
pub fn source_slug(filename: &str) -> String {
    let slug = slugify(filename);
    if !slug.is_empty() {
        return slug;
    }
    let digest = format!("{:x}", Sha256::digest(filename.as_bytes()));
    format!("untitled-{}", &digest[..8])
}

/// Human-readable title for a slug: hyphens become spaces, then each
/// alphabetic run is capitalized (`my-photo-01` → `My Photo 01`).
///
/// Digits break a run, so `01abc` becomes `01Abc`.
pub fn title_from_slug(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut prev_is_letter = false;
    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            title.push(c);
            prev_is_letter = false;
        }
    }
    title
}
