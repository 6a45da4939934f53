//! Opaque handle around a decoded logo image

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Shared, identity-compared image handle
///
/// Every handle built with [`ImageHandle::new`] receives a fresh id. Clones
/// share the id and the pixel buffer, so a clone is the *same* image as far as
/// the cache is concerned, while two separately loaded copies of one file are
/// distinct keys.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<ImageInner>,
}

struct ImageInner {
    id: Uuid,
    image: DynamicImage,
    content_digest: String,
}

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        let content_digest = format!("{:x}", Sha256::digest(image.as_bytes()));
        Self {
            inner: Arc::new(ImageInner {
                id: Uuid::new_v4(),
                image,
                content_digest,
            }),
        }
    }

    /// Solid-colour image, used when no logo file is available
    pub fn placeholder(width: u32, height: u32) -> Self {
        let pixels = RgbaImage::from_pixel(width, height, Rgba([0x44, 0x85, 0xf4, 0xff]));
        Self::new(DynamicImage::ImageRgba8(pixels))
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn width(&self) -> u32 {
        self.inner.image.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.image.dimensions()
    }

    /// True when the image has no pixels; such a handle counts as absent
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Hex SHA-256 over the raw pixel buffer
    pub fn content_digest(&self) -> &str {
        &self.inner.content_digest
    }

    pub fn image(&self) -> &DynamicImage {
        &self.inner.image
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ImageHandle {}

impl Hash for ImageHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.inner.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image:{} ({}x{})", self.inner.id, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let image = ImageHandle::placeholder(4, 4);
        let clone = image.clone();
        assert_eq!(image, clone);
        assert_eq!(image.id(), clone.id());
    }

    #[test]
    fn test_identical_pixels_are_distinct_handles() {
        let a = ImageHandle::placeholder(4, 4);
        let b = ImageHandle::placeholder(4, 4);
        assert_ne!(a, b);
        assert_eq!(a.content_digest(), b.content_digest());
    }

    #[test]
    fn test_zero_sized_image_is_empty() {
        assert!(ImageHandle::placeholder(0, 8).is_empty());
        assert!(!ImageHandle::placeholder(1, 1).is_empty());
    }

    #[test]
    fn test_digest_is_sha256_hex() {
        let image = ImageHandle::placeholder(2, 2);
        assert_eq!(image.content_digest().len(), 64);
        assert!(image.content_digest().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
