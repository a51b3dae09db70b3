use crate::desktop::{self, DesktopParser, Outcome};
use crate::error::IndexError;
use crate::models::{ApplicationRecord, Rank, SearchGroup};
use crate::names::NameIndex;
use crate::store::EntryStore;
use log::debug;
use std::path::Path;

/// The application index: entry store plus name index, mutated in
/// lockstep so callers never observe an inconsistent intermediate
/// state. Single-threaded; the intended driver is one event loop
/// feeding sequential add/remove calls.
#[derive(Debug, Default)]
pub struct AppIndex {
    store: EntryStore,
    names: NameIndex,
}

impl AppIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch construction. Groups are visited in rank order (position
    /// in the slice is the rank), so the first occupant of an id is
    /// always from a better-or-equal group; later files colliding on
    /// the same id are discarded unconditionally. This is deliberately
    /// different from `add`, which compares ranks explicitly.
    pub fn build(groups: &[SearchGroup]) -> Result<Self, IndexError> {
        let mut index = Self::new();
        let mut parser = DesktopParser::new();

        for (pos, group) in groups.iter().enumerate() {
            let rank = Rank::try_from(pos).map_err(|_| IndexError::RankOverflow)?;

            for file in &group.files {
                let id = desktop::desktop_entry_id(file, &group.base)?;

                match parser.parse(file)? {
                    Outcome::Disabled => {
                        debug!("`{}` skipped: disabled", file.display());
                    }
                    // Groups arrive in rank order, so an occupied id
                    // always belongs to a better-or-equal group: the
                    // newcomer is discarded without a rank comparison.
                    Outcome::App(_) if index.store.contains(&id) => {
                        debug!("`{}` discarded: id `{id}` already taken", file.display());
                    }
                    Outcome::App(record) => index.insert_new(id, record, rank),
                }
            }
        }

        debug!(
            "index built: {} entries, {} bound names",
            index.store.len(),
            index.names.len()
        );
        Ok(index)
    }

    /// Incremental add, driven by a created/modified report.
    ///
    /// A disabled file never deletes a previously good entry at the
    /// same id; a hard parse error propagates with the index untouched.
    /// An existing entry survives only when strictly better ranked:
    /// the incoming file wins ties, so a rewritten file at the same
    /// rank replaces its own entry in place.
    pub fn add(&mut self, path: &Path, base: &Path, rank: Rank) -> Result<(), IndexError> {
        let id = desktop::desktop_entry_id(path, base)?;

        // Parse before touching any state.
        let record = match DesktopParser::new().parse(path)? {
            Outcome::Disabled => {
                debug!("add `{id}`: disabled, existing entry (if any) kept");
                return Ok(());
            }
            Outcome::App(record) => record,
        };

        match self.store.get(&id).map(|e| e.rank) {
            None => {
                debug!("add `{id}` at rank {rank}");
                self.insert_new(id, record, rank);
            }
            Some(existing) if existing < rank => {
                debug!("add `{id}` ignored: rank {existing} entry is better than {rank}");
            }
            Some(_) => {
                debug!("add `{id}`: replacing entry at rank {rank}");
                self.names.unregister(&self.store, &id, false);
                self.names.unregister(&self.store, &id, true);
                self.store.overwrite(&id, record, rank);
                self.names.register(&self.store, &id, false);
                self.names.register(&self.store, &id, true);
            }
        }

        Ok(())
    }

    /// Incremental remove, driven by a deletion report. The entry must
    /// exist: callers only report removal of files they previously
    /// reported as added, so an unknown id means the index can no
    /// longer be trusted and the process aborts.
    pub fn remove(&mut self, path: &Path, base: &Path) -> Result<(), IndexError> {
        let id = desktop::desktop_entry_id(path, base)?;
        self.remove_id(&id);
        Ok(())
    }

    fn remove_id(&mut self, id: &str) {
        if !self.store.contains(id) {
            panic!("app index: remove of unknown id `{id}`");
        }

        debug!("remove `{id}`");
        // Bindings go first; a binding must never outlive the entry it
        // references.
        self.names.unregister(&self.store, id, false);
        self.names.unregister(&self.store, id, true);
        self.store.erase(id);
    }

    fn insert_new(&mut self, id: String, record: ApplicationRecord, rank: Rank) {
        self.store.insert(id.clone(), record, rank);
        self.names.register(&self.store, &id, false);
        self.names.register(&self.store, &id, true);
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<&ApplicationRecord> {
        self.store.get(id).map(|e| &e.app)
    }

    /// The application currently winning `name`, and whether it wins
    /// via GenericName.
    pub fn resolve_name(&self, name: &str) -> Option<(&ApplicationRecord, bool)> {
        let binding = self.names.get(name)?;
        let entry = self
            .store
            .get(&binding.id)
            .unwrap_or_else(|| panic!("app index: dangling binding for `{name}`"));
        Some((&entry.app, binding.generic))
    }

    /// All stored entries: (id, record, rank).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ApplicationRecord, Rank)> {
        self.store.iter().map(|(id, e)| (id, &e.app, e.rank))
    }

    /// Read-only view of the name index: (display string, winning
    /// application, via-GenericName flag).
    pub fn names(&self) -> impl Iterator<Item = (&str, &ApplicationRecord, bool)> {
        self.names.iter().map(|(name, binding)| {
            let entry = self
                .store
                .get(&binding.id)
                .unwrap_or_else(|| panic!("app index: dangling binding for `{name}`"));
            (name, &entry.app, binding.generic)
        })
    }

    /// Full-scan invariant verifier. Not part of the runtime contract;
    /// the test suite runs it after every mutating operation. Panics on
    /// the first violation found.
    pub fn check_inner_state(&self) {
        for (id, entry) in self.store.iter() {
            if id.is_empty() {
                panic!("app index: empty id in entry store");
            }
            if entry.app.name.is_empty() {
                panic!("app index: entry `{id}` has an empty name");
            }
        }

        for (name, binding) in self.names.iter() {
            let Some(entry) = self.store.get(&binding.id) else {
                panic!(
                    "app index: binding `{name}` -> `{}` has no entry",
                    binding.id
                );
            };
            if entry.app.display_name(binding.generic) != name {
                panic!(
                    "app index: binding `{name}` does not match field of `{}`",
                    binding.id
                );
            }

            for (other_id, other) in self.store.iter() {
                if other.rank < entry.rank
                    && (other.app.name == name || other.app.generic_name == name)
                {
                    panic!(
                        "app index: `{other_id}` outranks winner `{}` for `{name}`",
                        binding.id
                    );
                }
            }
        }
    }
}
