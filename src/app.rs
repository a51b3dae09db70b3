use crate::cli::{Cli, Cmd};
use crate::commands;

pub fn run(cli: Cli) -> i32 {
    // Resolve scan roots from XDG + -p paths
    let scan_roots = crate::xdg::build_scan_roots(&cli.paths);

    match &cli.cmd {
        Cmd::Scan { limit, json } => commands::scan::scan(&scan_roots, *limit, *json),
        Cmd::List { json } => commands::list::list(&scan_roots, *json),
        Cmd::Names { json } => commands::names::names(&scan_roots, *json),
        Cmd::Lookup { desktop_id, json } => {
            commands::lookup::lookup(&scan_roots, desktop_id, *json)
        }
        Cmd::Resolve { query, json } => commands::resolve::resolve(&scan_roots, query, *json),
        Cmd::Launch { query } => commands::launch::launch(&scan_roots, query),
        Cmd::Watch => commands::watch::watch(&scan_roots),
        Cmd::Parse { path, json } => commands::parse::parse(path, *json),
    }
}
