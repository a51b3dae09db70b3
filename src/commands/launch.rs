use super::common::load_index;
use crate::history::UsageStore;
use crate::launch::spawn_app;
use crate::matcher::resolve_choice;
use std::path::PathBuf;

pub fn launch(scan_roots: &[PathBuf], query: &str) -> i32 {
    let index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    // A typed display name (possibly with trailing args) is the normal
    // path; a raw desktop-id works as a fallback.
    let (app, args) = if let Some(choice) = resolve_choice(&index, query) {
        (choice.app, shell_args(choice.args))
    } else if let Some(app) = index.lookup_by_id(query.trim()) {
        (app, Vec::new())
    } else {
        eprintln!("No application matches: {query}");
        return 1;
    };

    if let Err(e) = spawn_app(app, &args) {
        eprintln!("appindex: {e}");
        return 1;
    }

    let mut history = UsageStore::load(&index);
    history.increment(&app.name);
    history.flush();

    0
}

fn shell_args(args: &str) -> Vec<String> {
    if args.is_empty() {
        return Vec::new();
    }
    shlex::split(args).unwrap_or_else(|| args.split_whitespace().map(str::to_string).collect())
}
