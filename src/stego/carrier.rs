//! Loading and saving carrier images
//!
//! Carriers are normalised to 8-bit RGBA on load. Output is always PNG.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::Result;

/// Decode an image file into RGBA8
pub fn load(path: &Path) -> Result<RgbaImage> {
    let format = ImageFormat::from_path(path).ok();
    if matches!(format, Some(ImageFormat::Jpeg | ImageFormat::WebP)) {
        warn!(path = %path.display(), "lossy carrier format, hidden data may not survive");
    }

    let image = image::open(path)?.to_rgba8();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded carrier");
    Ok(image)
}

/// Decode an in-memory image into RGBA8
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Write `image` as PNG regardless of the extension of `path`
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    debug!(path = %path.display(), "saved carrier");
    Ok(())
}

/// Encode `image` as PNG bytes
pub fn to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
