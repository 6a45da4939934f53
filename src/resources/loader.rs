use image::ImageFormat;
use std::path::Path;
use tracing::debug;

use crate::errors::{ResourceError, ResourceResult};
use crate::models::ImageHandle;

/// Decode a logo file into an image handle
pub fn load_image(path: impl AsRef<Path>) -> ResourceResult<ImageHandle> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    load_image_from_memory(&data, path)
}

/// Decode in-memory logo bytes; `origin` is only used for error reporting
pub fn load_image_from_memory(data: &[u8], origin: &Path) -> ResourceResult<ImageHandle> {
    let format = detect_image_format(data);
    let decoded = match format {
        Some(format) => image::load_from_memory_with_format(data, format),
        None => image::load_from_memory(data),
    }
    .map_err(|source| ResourceError::ImageDecode {
        path: origin.to_path_buf(),
        source,
    })?;

    let handle = ImageHandle::new(decoded);
    if handle.is_empty() {
        return Err(ResourceError::EmptyImage {
            path: origin.to_path_buf(),
        });
    }

    debug!(
        "Loaded {} from {} ({}x{}, {} bytes)",
        format.map(format_to_mime_type).unwrap_or("image/unknown"),
        origin.display(),
        handle.width(),
        handle.height(),
        data.len()
    );
    Ok(handle)
}

fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageFormat::Png)
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(b"GIF8") {
        Some(ImageFormat::Gif)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageFormat::WebP)
    } else {
        None
    }
}

fn format_to_mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        _ => "application/octet-stream",
    }
}
