//! Single-field index from key to record id

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::arena::RecordArena;
use crate::models::{Record, RecordId};

/// Accessor for the record field an index is keyed on
pub(crate) type FieldOf<Q> = for<'r> fn(&'r Record) -> &'r Q;

/// One of the three lookup structures
///
/// Entries are only ever *added* by cache operations. An entry whose key no
/// longer matches the current field of its record is stale: it is invisible
/// through [`FieldIndex::resolve`] and removed by [`FieldIndex::purge_if_stale`].
#[derive(Debug)]
pub(crate) struct FieldIndex<K> {
    entries: HashMap<K, RecordId>,
}

impl<K: Eq + Hash> FieldIndex<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn install(&mut self, key: K, id: RecordId) {
        self.entries.insert(key, id);
    }

    /// Live record for `key`, or `None` when absent or stale
    pub(crate) fn resolve<'a, Q>(
        &self,
        arena: &'a RecordArena,
        key: &Q,
        field: FieldOf<Q>,
    ) -> Option<&'a Record>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.entries.get(key)?;
        arena.get(id).filter(|record| field(*record) == key)
    }

    pub(crate) fn points_to<Q>(&self, key: &Q, id: RecordId) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key) == Some(&id)
    }

    /// Remove the entry for `key` if it exists and is stale
    pub(crate) fn purge_if_stale<Q>(&mut self, arena: &RecordArena, key: &Q, field: FieldOf<Q>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.entries.contains_key(key) || self.resolve(arena, key, field).is_some() {
            return false;
        }
        self.entries.remove(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
