//! Error type definitions for the triple-index cache
//!
//! The cache core only ever fails hard on invalid arguments; duplicate or
//! missing-key outcomes are reported as `Ok(false)` by the operations
//! themselves. Locator parsing and image loading report through
//! `ResourceError`, and the driver wraps both in `AppError`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Used by the demonstration driver and anything that stitches the cache
/// together with its resource collaborators.
#[derive(Error, Debug)]
pub enum AppError {
    /// Cache contract violations
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Resource collaborator errors
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors raised by `TripleIndexCache` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A required field was absent (empty name, zero-sized image)
    #[error("Invalid argument: {field} - {message}")]
    InvalidArgument { field: String, message: String },
}

/// Errors from the collaborators that produce locators and images
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Locator text is not a valid absolute URL
    #[error("Invalid locator: {locator} - {message}")]
    InvalidLocator { locator: String, message: String },

    /// Image bytes could not be decoded
    #[error("Image decode failed: {}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Decoded image has no pixels
    #[error("Empty image: {}", .path.display())]
    EmptyImage { path: PathBuf },

    /// Filesystem errors while reading a resource
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Create an invalid argument error for a named field
    pub fn invalid_argument<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the common "argument cannot be empty" case
    pub fn absent<F: Into<String>>(field: F) -> Self {
        Self::invalid_argument(field, "argument cannot be empty")
    }
}

impl ResourceError {
    /// Create an invalid locator error
    pub fn invalid_locator<L: Into<String>, M: Into<String>>(locator: L, message: M) -> Self {
        Self::InvalidLocator {
            locator: locator.into(),
            message: message.into(),
        }
    }
}
