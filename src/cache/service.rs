//! Triple-index cache keyed by channel name, stream locator and logo image

use tracing::{debug, trace};

use super::arena::RecordArena;
use super::index::FieldIndex;
use super::reclaim::{ReclaimQueue, StaleKey};
use crate::config::CacheConfig;
use crate::errors::{CacheError, CacheResult};
use crate::models::{ImageHandle, IndexStats, Locator, Record, RecordId};

/// In-memory cache addressable by any one of a record's three fields
///
/// Records live in a generational arena and each index maps a field value to a
/// `RecordId`. Updates only ever add the new key and overwrite the record's
/// field; the replaced key goes onto a reclaim queue and its entry is dropped
/// once the queue drains. Until then the entry is stale and every read or
/// duplicate check treats it as absent.
#[derive(Debug)]
pub struct TripleIndexCache {
    arena: RecordArena,
    by_name: FieldIndex<String>,
    by_locator: FieldIndex<Locator>,
    by_image: FieldIndex<ImageHandle>,
    reclaim: ReclaimQueue,
}

impl Default for TripleIndexCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleIndexCache {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            arena: RecordArena::with_capacity(capacity),
            by_name: FieldIndex::with_capacity(capacity),
            by_locator: FieldIndex::with_capacity(capacity),
            by_image: FieldIndex::with_capacity(capacity),
            reclaim: ReclaimQueue::new(config.effective_reclaim_threshold()),
        }
    }

    /// Insert a new record
    ///
    /// Returns `Ok(false)` without touching anything if the name, locator or
    /// image is already indexed, so partial duplicates are rejected too.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        locator: Locator,
        image: ImageHandle,
    ) -> CacheResult<bool> {
        let name = name.into();
        require_name("name", &name)?;
        require_image("image", &image)?;

        if self.contains_name(&name) || self.contains_locator(&locator) || self.contains_image(&image)
        {
            debug!(
                "Rejected insert of '{}' ({}, {}): value already indexed",
                name, locator, image
            );
            return Ok(false);
        }

        let id = self
            .arena
            .allocate(name.clone(), locator.clone(), image.clone());
        debug!("Inserted record {} '{}' ({}, {})", id, name, locator, image);

        self.by_name.install(name, id);
        self.by_locator.install(locator, id);
        self.by_image.install(image, id);
        Ok(true)
    }

    /// Point the record currently named `name` at `new_locator`
    pub fn update_locator(&mut self, name: &str, new_locator: Locator) -> CacheResult<bool> {
        require_name("name", name)?;

        if self.contains_locator(&new_locator) {
            debug!("Rejected locator update for '{}': {} already indexed", name, new_locator);
            return Ok(false);
        }
        let Some(id) = self.live_id_by_name(name) else {
            debug!("Rejected locator update: no record named '{}'", name);
            return Ok(false);
        };

        let Some(record) = self.arena.get_mut(id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut record.locator, new_locator.clone());
        record.touch();
        debug!("Record {} locator {} -> {}", id, previous, new_locator);

        self.by_locator.install(new_locator, id);
        self.retire(StaleKey::Locator(previous), id);
        Ok(true)
    }

    /// Rename the record currently named `old_name`
    pub fn rename(&mut self, old_name: &str, new_name: impl Into<String>) -> CacheResult<bool> {
        let new_name = new_name.into();
        require_name("old_name", old_name)?;
        require_name("new_name", &new_name)?;

        if self.contains_name(&new_name) {
            debug!("Rejected rename of '{}': '{}' already indexed", old_name, new_name);
            return Ok(false);
        }
        let Some(id) = self.live_id_by_name(old_name) else {
            debug!("Rejected rename: no record named '{}'", old_name);
            return Ok(false);
        };

        Ok(self.assign_name(id, new_name))
    }

    /// Replace the image of the record currently named `name`
    pub fn update_image(&mut self, name: &str, new_image: ImageHandle) -> CacheResult<bool> {
        require_name("name", name)?;
        require_image("image", &new_image)?;

        if self.contains_image(&new_image) {
            debug!("Rejected image update for '{}': {} already indexed", name, new_image);
            return Ok(false);
        }
        let Some(id) = self.live_id_by_name(name) else {
            debug!("Rejected image update: no record named '{}'", name);
            return Ok(false);
        };

        let Some(record) = self.arena.get_mut(id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut record.image, new_image.clone());
        record.touch();
        debug!("Record {} image {} -> {}", id, previous, new_image);

        self.by_image.install(new_image, id);
        self.retire(StaleKey::Image(previous), id);
        Ok(true)
    }

    /// Rename the record whose current image is `image`
    pub fn update_name_by_image(
        &mut self,
        image: &ImageHandle,
        new_name: impl Into<String>,
    ) -> CacheResult<bool> {
        let new_name = new_name.into();
        require_image("image", image)?;
        require_name("name", &new_name)?;

        if self.contains_name(&new_name) {
            debug!("Rejected rename of {}: '{}' already indexed", image, new_name);
            return Ok(false);
        }
        let Some(id) = self.query_by_image(image).map(Record::id) else {
            debug!("Rejected rename: no record for {}", image);
            return Ok(false);
        };

        Ok(self.assign_name(id, new_name))
    }

    pub fn query_by_name(&self, name: &str) -> Option<&Record> {
        self.by_name.resolve(&self.arena, name, Record::name)
    }

    pub fn query_by_locator(&self, locator: &Locator) -> Option<&Record> {
        self.by_locator.resolve(&self.arena, locator, Record::locator)
    }

    pub fn query_by_image(&self, image: &ImageHandle) -> Option<&Record> {
        self.by_image.resolve(&self.arena, image, Record::image)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.query_by_name(name).is_some()
    }

    pub fn contains_locator(&self, locator: &Locator) -> bool {
        self.query_by_locator(locator).is_some()
    }

    pub fn contains_image(&self, image: &ImageHandle) -> bool {
        self.query_by_image(image).is_some()
    }

    /// Live records in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.arena.len(),
            name_entries: self.by_name.len(),
            locator_entries: self.by_locator.len(),
            image_entries: self.by_image.len(),
            arena_slots: self.arena.slot_count(),
            pending_reclaim: self.reclaim.len(),
        }
    }

    /// Drain the reclaim queue now
    ///
    /// Returns the number of stale index entries and unreachable records
    /// removed. Draining also happens on its own after mutations, so this is
    /// only needed to force physical cleanup under a large reclaim threshold.
    pub fn collect(&mut self) -> usize {
        let mut purged_entries = 0;
        let mut purged_records = 0;

        while let Some(stale) = self.reclaim.pop() {
            let purged = match &stale.key {
                StaleKey::Name(name) => {
                    self.by_name
                        .purge_if_stale(&self.arena, name.as_str(), Record::name)
                }
                StaleKey::Locator(locator) => {
                    self.by_locator
                        .purge_if_stale(&self.arena, locator, Record::locator)
                }
                StaleKey::Image(image) => {
                    self.by_image
                        .purge_if_stale(&self.arena, image, Record::image)
                }
            };
            if purged {
                trace!("Purged stale {:?} entry of record {}", stale.key, stale.record);
                purged_entries += 1;
            }

            if !self.is_reachable(stale.record) && self.arena.release(stale.record).is_some() {
                trace!("Released unreachable record {}", stale.record);
                purged_records += 1;
            }
        }

        if purged_entries + purged_records > 0 {
            debug!(
                "Reclaimed {} stale entries and {} records ({} records live)",
                purged_entries,
                purged_records,
                self.arena.len()
            );
        }
        purged_entries + purged_records
    }

    pub fn clear(&mut self) {
        debug!("Clearing cache with {} records", self.arena.len());
        self.arena.clear();
        self.by_name.clear();
        self.by_locator.clear();
        self.by_image.clear();
        self.reclaim.clear();
    }

    fn live_id_by_name(&self, name: &str) -> Option<RecordId> {
        self.query_by_name(name).map(Record::id)
    }

    fn assign_name(&mut self, id: RecordId, new_name: String) -> bool {
        let Some(record) = self.arena.get_mut(id) else {
            return false;
        };
        let previous = std::mem::replace(&mut record.name, new_name.clone());
        record.touch();
        debug!("Record {} renamed '{}' -> '{}'", id, previous, new_name);

        self.by_name.install(new_name, id);
        self.retire(StaleKey::Name(previous), id);
        true
    }

    fn retire(&mut self, key: StaleKey, id: RecordId) {
        self.reclaim.push(key, id);
        if self.reclaim.should_drain() {
            self.collect();
        }
    }

    /// A record stays alive while any index still maps its current value to it
    fn is_reachable(&self, id: RecordId) -> bool {
        self.arena.get(id).is_some_and(|record| {
            self.by_name.points_to(record.name(), id)
                || self.by_locator.points_to(record.locator(), id)
                || self.by_image.points_to(record.image(), id)
        })
    }
}

fn require_name(field: &str, value: &str) -> CacheResult<()> {
    if value.trim().is_empty() {
        return Err(CacheError::absent(field));
    }
    Ok(())
}

fn require_image(field: &str, image: &ImageHandle) -> CacheResult<()> {
    if image.is_empty() {
        return Err(CacheError::invalid_argument(field, "image has no pixels"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(path: &str) -> Locator {
        Locator::parse(&format!("http://example.com/{}", path)).unwrap()
    }

    fn image() -> ImageHandle {
        ImageHandle::placeholder(8, 8)
    }

    fn deferred(threshold: usize) -> TripleIndexCache {
        TripleIndexCache::with_config(&CacheConfig {
            initial_capacity: 4,
            reclaim_threshold: threshold,
        })
    }

    #[test]
    fn test_insert_then_query_every_index() {
        let mut cache = TripleIndexCache::new();
        let logo = image();
        assert!(cache.insert("bbc one", locator("bbc1"), logo.clone()).unwrap());

        let by_name = cache.query_by_name("bbc one").unwrap();
        let by_locator = cache.query_by_locator(&locator("bbc1")).unwrap();
        let by_image = cache.query_by_image(&logo).unwrap();
        assert_eq!(by_name.id(), by_locator.id());
        assert_eq!(by_name.id(), by_image.id());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalid_arguments_do_not_mutate() {
        let mut cache = TripleIndexCache::new();
        let err = cache.insert("  ", locator("a"), image()).unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument { ref field, .. } if field == "name"));

        let err = cache
            .insert("a", locator("a"), ImageHandle::placeholder(0, 0))
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument { ref field, .. } if field == "image"));
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), IndexStats::default());
    }

    #[test]
    fn test_stale_name_hidden_while_pending() {
        let mut cache = deferred(16);
        cache.insert("alpha", locator("a"), image()).unwrap();
        assert!(cache.rename("alpha", "beta").unwrap());

        // old entry is still stored but not observable
        let stats = cache.stats();
        assert_eq!(stats.name_entries, 2);
        assert_eq!(stats.pending_reclaim, 1);
        assert!(cache.query_by_name("alpha").is_none());
        assert!(!cache.contains_name("alpha"));

        assert_eq!(cache.collect(), 1);
        assert!(cache.stats().is_compact());
    }

    #[test]
    fn test_stale_key_can_be_claimed_by_new_record() {
        let mut cache = deferred(16);
        cache.insert("alpha", locator("a"), image()).unwrap();
        cache.rename("alpha", "beta").unwrap();

        assert!(cache.insert("alpha", locator("b"), image()).unwrap());
        let alpha = cache.query_by_name("alpha").unwrap().id();
        let beta = cache.query_by_name("beta").unwrap().id();
        assert_ne!(alpha, beta);

        // draining must not drop the re-claimed key
        cache.collect();
        assert_eq!(cache.query_by_name("alpha").unwrap().id(), alpha);
        assert!(cache.stats().is_compact());
    }

    #[test]
    fn test_rename_back_keeps_entry() {
        let mut cache = deferred(16);
        cache.insert("alpha", locator("a"), image()).unwrap();
        assert!(cache.rename("alpha", "beta").unwrap());
        assert!(cache.rename("beta", "alpha").unwrap());

        cache.collect();
        assert_eq!(cache.query_by_name("alpha").unwrap().name(), "alpha");
        assert!(cache.query_by_name("beta").is_none());
        assert_eq!(cache.stats().name_entries, 1);
    }

    #[test]
    fn test_update_to_own_value_is_rejected() {
        let mut cache = TripleIndexCache::new();
        let logo = image();
        cache.insert("alpha", locator("a"), logo.clone()).unwrap();

        assert!(!cache.rename("alpha", "alpha").unwrap());
        assert!(!cache.update_locator("alpha", locator("a")).unwrap());
        assert!(!cache.update_image("alpha", logo.clone()).unwrap());
        assert!(!cache.update_name_by_image(&logo, "alpha").unwrap());
    }

    #[test]
    fn test_updated_at_moves_on_mutation() {
        let mut cache = TripleIndexCache::new();
        cache.insert("alpha", locator("a"), image()).unwrap();
        let created = cache.query_by_name("alpha").unwrap().created_at();

        cache.update_locator("alpha", locator("b")).unwrap();
        let record = cache.query_by_name("alpha").unwrap();
        assert_eq!(record.created_at(), created);
        assert!(record.updated_at() >= created);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = TripleIndexCache::new();
        cache.insert("alpha", locator("a"), image()).unwrap();
        cache.insert("beta", locator("b"), image()).unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.query_by_name("alpha").is_none());
        let stats = cache.stats();
        assert_eq!(stats.name_entries + stats.locator_entries + stats.image_entries, 0);
        assert!(cache.insert("alpha", locator("a"), image()).unwrap());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_rejections_are_logged() {
        let mut cache = TripleIndexCache::new();
        cache.insert("alpha", locator("a"), image()).unwrap();
        assert!(!cache.insert("alpha", locator("b"), image()).unwrap());
        assert!(!cache.rename("ghost", "beta").unwrap());

        assert!(logs_contain("Rejected insert of 'alpha'"));
        assert!(logs_contain("no record named 'ghost'"));
    }

    #[test]
    fn test_unreachable_record_is_released() {
        let mut cache = deferred(16);
        let logo = image();
        cache.insert("alpha", locator("a"), logo.clone()).unwrap();
        let id = cache.query_by_name("alpha").unwrap().id();

        // simulate every current-key entry having been dropped
        cache.by_name.clear();
        cache.by_locator.clear();
        cache.by_image.clear();
        cache.reclaim.push(StaleKey::Name("alpha".to_string()), id);

        assert_eq!(cache.collect(), 1);
        assert!(cache.is_empty());
        assert!(cache.arena.get(id).is_none());
    }
}
