use crate::desktop::build_search_groups;
use crate::error::IndexError;
use crate::index::AppIndex;
use serde::Serialize;
use std::path::PathBuf;

pub fn load_index(scan_roots: &[PathBuf]) -> Result<AppIndex, IndexError> {
    let groups = build_search_groups(scan_roots);
    AppIndex::build(&groups)
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("appindex: failed to serialize output: {e}"),
    }
}
