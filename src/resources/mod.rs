//! Collaborators that produce field values for the cache
//!
//! The cache treats locators and images as opaque keys. This module is where
//! they come from: text is resolved into a [`Locator`] and logo files are
//! decoded into [`ImageHandle`](crate::models::ImageHandle)s.

pub mod loader;

pub use loader::{load_image, load_image_from_memory};

use crate::errors::ResourceResult;
use crate::models::Locator;

/// Resolve user-supplied text into a locator
///
/// Text without a scheme is treated as an `http://` address, so
/// `www.google.com` and `http://www.google.com` resolve to the same key.
pub fn resolve_locator(input: &str) -> ResourceResult<Locator> {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        Locator::parse(trimmed)
    } else {
        Locator::parse(&format!("http://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ResourceError;

    #[test]
    fn test_resolve_locator_adds_scheme() {
        assert_eq!(
            resolve_locator("www.google.com").unwrap(),
            Locator::parse("http://www.google.com").unwrap()
        );
        assert_eq!(
            resolve_locator("https://example.com/live.m3u8").unwrap().as_str(),
            "https://example.com/live.m3u8"
        );
    }

    #[test]
    fn test_resolve_locator_rejects_empty() {
        assert!(matches!(
            resolve_locator("   ").unwrap_err(),
            ResourceError::InvalidLocator { .. }
        ));
    }
}
