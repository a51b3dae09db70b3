use super::common::{load_index, print_json};
use crate::matcher::resolve_choice;
use std::path::PathBuf;

pub fn resolve(scan_roots: &[PathBuf], query: &str, json: bool) -> i32 {
    let index = match load_index(scan_roots) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("appindex: {e}");
            return 1;
        }
    };

    let Some(choice) = resolve_choice(&index, query) else {
        eprintln!("No application matches: {query}");
        return 1;
    };

    if json {
        #[derive(serde::Serialize)]
        struct ChoiceOut<'a> {
            display: &'a str,
            name: &'a str,
            generic: bool,
            exec: &'a str,
            args: &'a str,
            location: String,
        }

        print_json(&ChoiceOut {
            display: choice.name,
            name: &choice.app.name,
            generic: choice.generic,
            exec: &choice.app.exec,
            args: choice.args,
            location: choice.app.location.to_string_lossy().to_string(),
        });
    } else {
        println!("{}\t{}", choice.app.name, choice.app.location.display());
        if !choice.args.is_empty() {
            println!("args={}", choice.args);
        }
    }

    0
}
