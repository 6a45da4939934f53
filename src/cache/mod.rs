//! In-memory channel cache with three consistent lookup indices
//!
//! A channel record is a (name, locator, image) triple and can be looked up by
//! any of the three. The indices are kept consistent without an explicit
//! delete:
//!
//! - The record's *current* field value is the source of truth; an index entry
//!   whose key differs from it is stale and never observable
//! - Updates install the new key and enqueue the replaced one for reclamation
//! - The reclaim queue drains automatically, purging stale entries and any
//!   record that no index reaches any more

mod arena;
mod index;
mod reclaim;
pub mod service;

pub use service::TripleIndexCache;
