use super::common::load_index;
use crate::watch;
use std::path::PathBuf;

pub fn watch(scan_roots: &[PathBuf]) -> i32 {
    let mut index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    eprintln!("appindex: watching with {} entries", index.count());

    if let Err(e) = watch::run(&mut index, scan_roots) {
        eprintln!("appindex: {e}");
        return 1;
    }

    0
}
