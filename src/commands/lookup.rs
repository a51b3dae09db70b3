use super::common::{load_index, print_json};
use std::path::PathBuf;

pub fn lookup(scan_roots: &[PathBuf], desktop_id: &str, json: bool) -> i32 {
    let index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    let Some(app) = index.lookup_by_id(desktop_id) else {
        eprintln!("Unknown desktop-id: {desktop_id}");
        return 1;
    };

    if json {
        print_json(app);
    } else {
        println!("{app:#?}");
    }

    0
}
