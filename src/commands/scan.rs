use crate::desktop::build_search_groups;
use super::common::print_json;
use std::path::PathBuf;

pub fn scan(scan_roots: &[PathBuf], limit: Option<usize>, json: bool) -> i32 {
    let groups = build_search_groups(scan_roots);

    let found_count: usize = groups.iter().map(|g| g.files.len()).sum();
    let mut files: Vec<String> = groups
        .iter()
        .flat_map(|g| g.files.iter())
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    if let Some(limit) = limit {
        files.truncate(limit);
    }

    if json {
        #[derive(serde::Serialize)]
        struct ScanOut {
            scanned_roots: Vec<String>,
            found_count: usize,
            files: Vec<String>,
        }

        print_json(&ScanOut {
            scanned_roots: scan_roots
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
            found_count,
            files,
        });
    } else {
        println!("roots:");
        for r in scan_roots {
            println!("  {}", r.display());
        }
        println!("found_count={found_count}");
        println!("showing={}", files.len());
        for f in &files {
            println!("{f}");
        }
    }

    0
}
