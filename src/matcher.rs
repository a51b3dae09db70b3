use crate::index::AppIndex;
use crate::models::ApplicationRecord;

/// Result of resolving a typed line against the name index: the
/// winning application plus whatever the user typed after the name.
#[derive(Debug)]
pub struct Choice<'a> {
    pub name: &'a str,
    pub app: &'a ApplicationRecord,
    pub generic: bool,
    /// Leftover argument text, already trimmed. Empty for an exact match.
    pub args: &'a str,
}

/// Resolve a typed line to an application. Exact display-name match
/// first; otherwise the longest bound name that prefixes the input at a
/// word boundary wins, and the rest of the line becomes arguments.
pub fn resolve_choice<'a>(index: &'a AppIndex, input: &'a str) -> Option<Choice<'a>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut best: Option<Choice<'a>> = None;
    for (name, app, generic) in index.names() {
        if name == input {
            return Some(Choice {
                name,
                app,
                generic,
                args: "",
            });
        }

        let Some(rest) = input.strip_prefix(name) else {
            continue;
        };
        // Word boundary: "Files" must not match "Filesystem Cleaner".
        let Some(rest) = rest.strip_prefix(' ') else {
            continue;
        };

        if best.as_ref().map(|b| name.len() > b.name.len()).unwrap_or(true) {
            best = Some(Choice {
                name,
                app,
                generic,
                args: rest.trim(),
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop;
    use std::fs;
    use tempfile::TempDir;

    fn index_with(entries: &[(&str, &str)]) -> (TempDir, AppIndex) {
        let dir = TempDir::new().expect("tempdir");
        for (file, name) in entries {
            fs::write(
                dir.path().join(file),
                format!("[Desktop Entry]\nName={name}\nExec=true\n"),
            )
            .expect("write desktop file");
        }
        let groups = desktop::build_search_groups(&[dir.path().to_path_buf()]);
        let index = AppIndex::build(&groups).expect("build");
        (dir, index)
    }

    #[test]
    fn exact_name_resolves_without_args() {
        let (_dir, index) = index_with(&[("ff.desktop", "Firefox")]);

        let choice = resolve_choice(&index, "Firefox").expect("choice");
        assert_eq!(choice.name, "Firefox");
        assert_eq!(choice.args, "");
    }

    #[test]
    fn leftover_text_becomes_args() {
        let (_dir, index) = index_with(&[("ff.desktop", "Firefox")]);

        let choice = resolve_choice(&index, "Firefox --private example.org").expect("choice");
        assert_eq!(choice.name, "Firefox");
        assert_eq!(choice.args, "--private example.org");
    }

    #[test]
    fn longest_prefix_wins() {
        let (_dir, index) = index_with(&[
            ("code.desktop", "Code"),
            ("code-oss.desktop", "Code OSS"),
        ]);

        let choice = resolve_choice(&index, "Code OSS file.rs").expect("choice");
        assert_eq!(choice.name, "Code OSS");
        assert_eq!(choice.args, "file.rs");
    }

    #[test]
    fn prefix_must_end_at_a_word_boundary() {
        let (_dir, index) = index_with(&[("files.desktop", "Files")]);

        assert!(resolve_choice(&index, "Filesystem").is_none());
        assert!(resolve_choice(&index, "Files stem").is_some());
    }

    #[test]
    fn unknown_input_resolves_to_nothing() {
        let (_dir, index) = index_with(&[("ff.desktop", "Firefox")]);

        assert!(resolve_choice(&index, "Emacs").is_none());
        assert!(resolve_choice(&index, "").is_none());
        assert!(resolve_choice(&index, "   ").is_none());
    }
}
