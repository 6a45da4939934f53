//! Centralized error handling for the triple-index cache
//!
//! # Error Categories
//!
//! - **Cache Errors**: contract violations on cache operations (absent arguments)
//! - **Resource Errors**: locator parsing and image loading failures
//! - **Application Errors**: driver-level failures wrapping the two above
//!
//! Duplicate keys, collisions and unknown keys are *not* errors: the cache
//! operations return `Ok(false)` for those and leave state untouched.
//!
//! # Usage
//!
//! ```rust
//! use triple_cache::errors::{CacheError, CacheResult};
//!
//! fn example_function(name: &str) -> CacheResult<()> {
//!     if name.trim().is_empty() {
//!         return Err(CacheError::absent("name"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for cache operation Results
pub type CacheResult<T> = Result<T, CacheError>;

/// Convenience type alias for resource collaborator Results
pub type ResourceResult<T> = Result<T, ResourceError>;
