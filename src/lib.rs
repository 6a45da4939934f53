pub mod cache;
pub mod config;
pub mod demo;
pub mod errors;
pub mod models;
pub mod resources;

pub use cache::TripleIndexCache;
pub use errors::{AppError, CacheError, ResourceError};
pub use models::{ImageHandle, IndexStats, Locator, Record, RecordId};
