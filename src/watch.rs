use crate::desktop;
use crate::error::IndexError;
use crate::index::AppIndex;
use crate::models::Rank;
use log::{info, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Drive the index from filesystem-change notifications. The notify
/// backend may thread internally; this loop is the single consumer and
/// applies add/remove calls strictly sequentially, so the index never
/// sees concurrent mutation.
///
/// Runs until the watcher channel closes. Hard parse errors propagate:
/// a broken desktop file is the caller's signal to stop.
pub fn run(index: &mut AppIndex, scan_roots: &[PathBuf]) -> Result<(), WatchError> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    for root in scan_roots {
        if root.is_dir() {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }
    }

    info!("watching {} roots, {} entries", scan_roots.len(), index.count());

    for result in rx {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!("watch event error: {e}");
                continue;
            }
        };

        for path in &event.paths {
            if !is_desktop_file(path) {
                continue;
            }
            let Some((base, rank)) = owning_root(scan_roots, path) else {
                continue;
            };

            match event.kind {
                // Renames surface as Modify on some backends; treat a
                // path that no longer exists like a removal.
                EventKind::Create(_) | EventKind::Modify(_) if path.is_file() => {
                    apply_add(index, path, base, rank)?;
                }
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
                    apply_remove(index, path, base)?;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn apply_add(index: &mut AppIndex, path: &Path, base: &Path, rank: Rank) -> Result<(), WatchError> {
    let before = index.count();
    index.add(path, base, rank)?;
    info!(
        "change applied: add `{}` (entries {} -> {})",
        path.display(),
        before,
        index.count()
    );
    Ok(())
}

fn apply_remove(index: &mut AppIndex, path: &Path, base: &Path) -> Result<(), WatchError> {
    let id = desktop::desktop_entry_id(path, base)?;

    // Only report removals for files the index actually owns: the
    // deleted file may have been disabled all along, or shadowed by a
    // same-id file from a better root.
    let owned = index
        .lookup_by_id(&id)
        .map(|app| app.location == path)
        .unwrap_or(false);
    if !owned {
        return Ok(());
    }

    index.remove(path, base)?;
    info!(
        "change applied: remove `{id}` ({} entries)",
        index.count()
    );
    Ok(())
}

fn owning_root<'a>(scan_roots: &'a [PathBuf], path: &Path) -> Option<(&'a Path, Rank)> {
    scan_roots
        .iter()
        .enumerate()
        .find(|(_, root)| path.starts_with(root))
        .and_then(|(pos, root)| Rank::try_from(pos).ok().map(|rank| (root.as_path(), rank)))
}

fn is_desktop_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("desktop"))
        .unwrap_or(false)
}
