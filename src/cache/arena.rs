//! Slot arena that owns every record in the cache

use crate::models::{ImageHandle, Locator, Record, RecordId};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    record: Option<Record>,
}

/// Generational arena of records
///
/// Indices never own records; they hold `RecordId`s into this arena. Freed
/// slots are reused with a bumped generation.
#[derive(Debug, Default)]
pub(crate) struct RecordArena {
    slots: Vec<Slot>,
    free_slots: Vec<usize>,
    live: usize,
}

impl RecordArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_slots: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<&Record> {
        self.slots
            .get(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_mut())
    }

    pub(crate) fn allocate(&mut self, name: String, locator: Locator, image: ImageHandle) -> RecordId {
        let slot = match self.free_slots.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let entry = &mut self.slots[slot];
        let id = RecordId {
            slot,
            generation: entry.generation,
        };
        entry.record = Some(Record::new(id, name, locator, image));
        self.live += 1;
        id
    }

    /// Drop the record behind `id`, returning it if it was still present
    pub(crate) fn release(&mut self, id: RecordId) -> Option<Record> {
        let slot = self
            .slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)?;
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.slot);
        self.live -= 1;
        Some(record)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().filter_map(|slot| slot.record.as_ref())
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.record.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_slots.push(index);
            }
        }
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocate(arena: &mut RecordArena, name: &str) -> RecordId {
        arena.allocate(
            name.to_string(),
            Locator::parse(&format!("http://example.com/{}", name)).unwrap(),
            ImageHandle::placeholder(2, 2),
        )
    }

    #[test]
    fn test_released_slot_is_reused_with_new_generation() {
        let mut arena = RecordArena::with_capacity(4);
        let first = allocate(&mut arena, "one");
        assert!(arena.release(first).is_some());

        let second = allocate(&mut arena, "two");
        assert_eq!(second.slot, first.slot);
        assert_ne!(second.generation, first.generation);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second).unwrap().name(), "two");
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut arena = RecordArena::with_capacity(1);
        let id = allocate(&mut arena, "one");
        assert!(arena.release(id).is_some());
        assert!(arena.release(id).is_none());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_clear_invalidates_ids() {
        let mut arena = RecordArena::default();
        let a = allocate(&mut arena, "a");
        let b = allocate(&mut arena, "b");
        arena.clear();

        assert_eq!(arena.len(), 0);
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_none());
        assert_eq!(arena.iter().count(), 0);
        assert_eq!(arena.slot_count(), 2);
    }
}
