use crate::models::{ApplicationRecord, Rank};
use std::collections::HashMap;

/// One application plus the rank of the search directory it came from.
/// Exclusively owned by the entry store under its desktop entry id.
#[derive(Debug, Clone)]
pub struct IndexedApplication {
    pub app: ApplicationRecord,
    pub rank: Rank,
}

/// Primary table, keyed by desktop entry id. Ground truth for the name
/// index: bindings hold ids and every read re-resolves through here.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: HashMap<String, IndexedApplication>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh entry. Callers check occupancy first; an occupied
    /// id here is a bookkeeping bug, not a recoverable condition.
    pub fn insert(&mut self, id: String, app: ApplicationRecord, rank: Rank) {
        debug_assert!(!id.is_empty());
        let prev = self.entries.insert(id.clone(), IndexedApplication { app, rank });
        if prev.is_some() {
            panic!("entry store: insert over occupied id `{id}`");
        }
    }

    /// Replace record and rank at an existing id. The slot keeps its
    /// identity: references held by id stay valid across the overwrite.
    pub fn overwrite(&mut self, id: &str, app: ApplicationRecord, rank: Rank) {
        let Some(slot) = self.entries.get_mut(id) else {
            panic!("entry store: overwrite of unknown id `{id}`");
        };
        slot.app = app;
        slot.rank = rank;
    }

    pub fn erase(&mut self, id: &str) {
        if self.entries.remove(id).is_none() {
            panic!("entry store: erase of unknown id `{id}`");
        }
    }

    pub fn get(&self, id: &str) -> Option<&IndexedApplication> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexedApplication)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
