use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod image_handle;
pub mod locator;

pub use image_handle::ImageHandle;
pub use locator::Locator;

/// Stable handle to a record slot in the cache arena
///
/// The generation changes whenever a slot is reclaimed and reused, so an id
/// held past its record's lifetime never resolves to a different record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

impl RecordId {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

/// A channel entry: name, stream locator and logo image
///
/// Fields are only mutated by the owning cache, which keeps its indices in
/// step with every change.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) id: RecordId,
    pub(crate) name: String,
    pub(crate) locator: Locator,
    pub(crate) image: ImageHandle,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Record {
    pub(crate) fn new(id: RecordId, name: String, locator: Locator, image: ImageHandle) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            locator,
            image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            name: self.name.clone(),
            locator: self.locator.to_string(),
            image_id: self.image.id().to_string(),
            image_width: self.image.width(),
            image_height: self.image.height(),
            image_digest: self.image.content_digest().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serializable view of a record, for reports and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub name: String,
    pub locator: String,
    pub image_id: String,
    pub image_width: u32,
    pub image_height: u32,
    pub image_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical sizes of the cache structures
///
/// Index sizes count every stored entry, including stale ones still waiting
/// in the reclaim queue; `records` counts live records only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    pub name_entries: usize,
    pub locator_entries: usize,
    pub image_entries: usize,
    pub arena_slots: usize,
    pub pending_reclaim: usize,
}

impl IndexStats {
    /// No index holds more entries than there are live records
    pub fn is_compact(&self) -> bool {
        self.name_entries == self.records
            && self.locator_entries == self.records
            && self.image_entries == self.records
    }
}
