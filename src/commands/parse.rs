use super::common::print_json;
use crate::desktop::{Outcome, parse_desktop_file};
use std::path::Path;

pub fn parse(path: &Path, json: bool) -> i32 {
    match parse_desktop_file(path) {
        Ok(Outcome::App(app)) => {
            if json {
                print_json(&app);
            } else {
                println!("{app:#?}");
            }
            0
        }
        Ok(Outcome::Disabled) => {
            eprintln!("{} is disabled (hidden or not shown here)", path.display());
            1
        }
        Err(e) => {
            eprintln!("appindex: {e}");
            1
        }
    }
}
