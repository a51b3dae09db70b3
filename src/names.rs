use crate::models::Rank;
use crate::store::EntryStore;
use std::collections::HashMap;

/// Non-owning association from a display string to the entry currently
/// winning it. Targets are desktop entry ids, never references: a read
/// through a binding re-resolves via the entry store, so a stale
/// binding fails a lookup instead of dangling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameBinding {
    pub id: String,
    /// Whether the win is via GenericName rather than Name.
    pub generic: bool,
}

/// Secondary table: at most one binding per distinct display string.
/// Derived entirely from the entry store; the index manager calls
/// register/unregister in lockstep with every store mutation.
#[derive(Debug, Default)]
pub struct NameIndex {
    bindings: HashMap<String, NameBinding>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one display string of `id` for binding. No-op when the
    /// string is empty (absent GenericName). An already-bound string is
    /// rebound only if `id` holds a strictly smaller rank than the
    /// current winner; otherwise the new entry stays an unbound
    /// candidate, recoverable later by the promotion scan.
    pub fn register(&mut self, store: &EntryStore, id: &str, generic: bool) {
        let Some(entry) = store.get(id) else {
            panic!("name index: register for unknown id `{id}`");
        };
        let name = entry.app.display_name(generic);
        if name.is_empty() {
            return;
        }

        let rebind = match self.bindings.get(name) {
            None => true,
            Some(current) if current.id == id && current.generic == generic => return,
            Some(current) => {
                let Some(winner) = store.get(&current.id) else {
                    panic!(
                        "name index: binding for `{name}` references unknown id `{}`",
                        current.id
                    );
                };
                entry.rank < winner.rank
            }
        };

        if rebind {
            self.bindings.insert(
                name.to_string(),
                NameBinding {
                    id: id.to_string(),
                    generic,
                },
            );
        }
    }

    /// Withdraw one display string of `id`. When `id` is not the
    /// current winner this is a no-op; when it is, the binding is
    /// removed and the best remaining candidate (smallest rank, id
    /// order on ties) is promoted by a full store scan. The scan skips
    /// `id` itself: the caller unregisters before erasing or
    /// overwriting, so the entry is still present in the store.
    pub fn unregister(&mut self, store: &EntryStore, id: &str, generic: bool) {
        let Some(entry) = store.get(id) else {
            panic!("name index: unregister for unknown id `{id}`");
        };
        let name = entry.app.display_name(generic);
        if name.is_empty() {
            return;
        }

        let Some(current) = self.bindings.get(name) else {
            return;
        };
        if current.id != id || current.generic != generic {
            return;
        }

        let name = name.to_string();
        self.bindings.remove(&name);

        if let Some(binding) = promotion_candidate(store, &name, id) {
            self.bindings.insert(name, binding);
        }
    }

    pub fn get(&self, name: &str) -> Option<&NameBinding> {
        self.bindings.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NameBinding)> {
        self.bindings.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Best remaining candidate for `name` among all stored entries other
/// than `skip_id`. Name wins over GenericName for a candidate matching
/// through both fields.
fn promotion_candidate(store: &EntryStore, name: &str, skip_id: &str) -> Option<NameBinding> {
    let mut best: Option<(Rank, NameBinding)> = None;

    for (id, entry) in store.iter() {
        if id == skip_id {
            continue;
        }

        let generic = if entry.app.name == name {
            false
        } else if entry.app.generic_name == name {
            true
        } else {
            continue;
        };

        let better = match &best {
            None => true,
            Some((rank, binding)) => {
                entry.rank < *rank || (entry.rank == *rank && id < binding.id.as_str())
            }
        };
        if better {
            best = Some((
                entry.rank,
                NameBinding {
                    id: id.to_string(),
                    generic,
                },
            ));
        }
    }

    best.map(|(_, binding)| binding)
}
