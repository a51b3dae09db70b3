use super::common::{load_index, print_json};
use crate::models::Rank;
use std::path::PathBuf;

pub fn list(scan_roots: &[PathBuf], json: bool) -> i32 {
    let index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    #[derive(serde::Serialize)]
    struct EntryRow {
        id: String,
        name: String,
        generic_name: String,
        rank: Rank,
        location: String,
    }

    let mut rows: Vec<EntryRow> = index
        .entries()
        .map(|(id, app, rank)| EntryRow {
            id: id.to_string(),
            name: app.name.clone(),
            generic_name: app.generic_name.clone(),
            rank,
            location: app.location.to_string_lossy().to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));

    if json {
        print_json(&rows);
    } else {
        for row in &rows {
            println!("{}\t{}\t{}", row.id, row.name, row.rank);
        }
    }

    0
}
