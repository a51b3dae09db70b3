use std::{env, path::PathBuf};

/// Search roots in precedence order: XDG_DATA_HOME first, then each
/// XDG_DATA_DIRS entry, then user-supplied extra roots. Position in
/// the returned list is the rank the index assigns.
pub fn build_scan_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots = Vec::<PathBuf>::new();

    // XDG_DATA_HOME (default ~/.local/share)
    let data_home = env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = env::var_os("HOME").unwrap_or_default();
            PathBuf::from(home).join(".local/share")
        });
    roots.push(data_home.join("applications"));

    // XDG_DATA_DIRS (default /usr/local/share:/usr/share)
    let data_dirs =
        env::var("XDG_DATA_DIRS").unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());

    for part in data_dirs
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        roots.push(PathBuf::from(part).join("applications"));
    }

    // User -p paths, scanned as given.
    for p in extra {
        roots.push(p.clone());
    }

    // Dedup while preserving precedence order.
    let mut out: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for r in roots {
        if !out.contains(&r) {
            out.push(r);
        }
    }
    out
}

pub fn data_dir() -> PathBuf {
    // XDG_DATA_HOME (default ~/.local/share)
    let base = env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = env::var_os("HOME").unwrap_or_default();
            PathBuf::from(home).join(".local/share")
        });

    base.join("appindex")
}
