use super::common::{load_index, print_json};
use std::path::PathBuf;

pub fn names(scan_roots: &[PathBuf], json: bool) -> i32 {
    let index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    #[derive(serde::Serialize)]
    struct NameRow {
        display: String,
        name: String,
        generic: bool,
        location: String,
    }

    let mut rows: Vec<NameRow> = index
        .names()
        .map(|(display, app, generic)| NameRow {
            display: display.to_string(),
            name: app.name.clone(),
            generic,
            location: app.location.to_string_lossy().to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.display.cmp(&b.display));

    if json {
        print_json(&rows);
    } else {
        for row in &rows {
            let via = if row.generic { "generic" } else { "name" };
            println!("{}\t{}\t{via}", row.display, row.name);
        }
    }

    0
}
