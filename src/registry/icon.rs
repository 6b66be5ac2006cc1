//! Icon resolution and decoding.
//!
//! Icon names go through the freedesktop icon theme lookup; only raster formats are decoded.
//! Anything that cannot be turned into pixels yields no icon.

use crate::model::{Icon, IconPixels};
use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Side length, in pixels, of the decoded thumbnail.
pub const THUMBNAIL_SIZE: u32 = 4;

/// Size requested from the icon theme; the closest available size is returned.
const LOOKUP_SIZE: u16 = 48;

const PIXMAP_DIRS: &[&str] = &["/usr/share/pixmaps", "/usr/local/share/pixmaps"];

fn is_raster(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png" | "jpg" | "jpeg" | "bmp" | "ico" | "gif" | "webp")
    )
}

/// Resolve an `Icon=` value to a raster image file.
pub fn resolve_icon_path(icon: &str) -> Option<PathBuf> {
    let icon = icon.trim();
    if icon.is_empty() {
        return None;
    }

    let direct = Path::new(icon);
    if direct.is_absolute() {
        return (direct.is_file() && is_raster(direct)).then(|| direct.to_path_buf());
    }

    // Some entries name the icon with its extension.
    let name = match direct.extension().and_then(|e| e.to_str()) {
        Some("png" | "svg" | "xpm") => direct
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(icon),
        _ => icon,
    };

    if let Some(themed) = freedesktop_icons::lookup(name)
        .with_size(LOOKUP_SIZE)
        .find()
        .filter(|p| is_raster(p))
    {
        return Some(themed);
    }

    PIXMAP_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(format!("{name}.png")))
        .find(|p| p.is_file())
}

/// Decode an image file and scale it to the thumbnail size.
pub fn decode_thumbnail(path: &Path) -> Result<IconPixels> {
    let img = image::open(path).with_context(|| format!("decode icon {}", path.display()))?;
    let thumb = img
        .resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
        .to_rgba8();
    Ok(IconPixels {
        width: thumb.width(),
        height: thumb.height(),
        rgba: thumb.into_raw(),
    })
}

/// Best-effort icon load: `None` whenever the icon cannot be found or decoded.
pub fn load_icon(icon: &str) -> Option<Icon> {
    let path = resolve_icon_path(icon)?;
    match decode_thumbnail(&path) {
        Ok(pixels) => Some(Icon { path, pixels }),
        Err(e) => {
            debug!(icon, error = %format!("{e:#}"), "icon not decodable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn absolute_png_is_decoded_to_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let icon = load_icon(path.to_str().unwrap()).expect("icon");
        assert_eq!(icon.path, path);
        assert_eq!(icon.pixels.width, THUMBNAIL_SIZE);
        assert_eq!(icon.pixels.height, THUMBNAIL_SIZE);
        assert_eq!(icon.pixels.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn missing_or_vector_icons_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("logo.svg");
        std::fs::write(&svg, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        assert!(load_icon(svg.to_str().unwrap()).is_none());
        assert!(load_icon("/nonexistent/icon.png").is_none());
        assert!(load_icon("").is_none());
    }

    #[test]
    fn corrupt_png_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(load_icon(path.to_str().unwrap()).is_none());
    }
}
