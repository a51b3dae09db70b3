use crate::error::{IndexError, ParseError};
use crate::models::{ApplicationRecord, SearchGroup};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Parse outcome for a single desktop file. Hard failures travel as
/// `ParseError` instead; "disabled" is ordinary control flow.
#[derive(Debug)]
pub enum Outcome {
    App(ApplicationRecord),
    Disabled,
}

/// Compute the desktop entry id per the Desktop Entry spec:
/// the path relative to its search root, with every `/` replaced
/// by `-`. `foo/bar.desktop` under `/usr/share/applications` becomes
/// `foo-bar.desktop`.
pub fn desktop_entry_id(path: &Path, base: &Path) -> Result<String, IndexError> {
    let rel = path
        .strip_prefix(base)
        .map_err(|_| IndexError::OutsideRoot {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        })?;

    Ok(rel.to_string_lossy().replace('/', "-"))
}

fn is_desktop_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("desktop"))
        .unwrap_or(false)
}

/// Walk each search root and collect its desktop files into one group
/// per root. Root order is precedence order; the group position is the
/// rank the index assigns.
pub fn build_search_groups(scan_roots: &[PathBuf]) -> Vec<SearchGroup> {
    let mut groups = Vec::with_capacity(scan_roots.len());

    for root in scan_roots {
        if !root.is_dir() {
            continue;
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_desktop_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        // Deterministic file order within a group.
        files.sort();

        groups.push(SearchGroup {
            base: root.clone(),
            files,
        });
    }

    groups
}

/// Locale-suffixed key resolution ("Name[fr_FR]=..."): keep the default
/// value and the best locale match seen so far.
#[derive(Default)]
struct LocalizedField {
    default: Option<String>,
    best_rank: Option<usize>,
    best_value: Option<String>,
}

impl LocalizedField {
    fn set(&mut self, locale: Option<&str>, value: String, prefs: &[String]) {
        match locale {
            None => {
                self.default = Some(value);
            }
            Some(loc) => {
                if let Some(rank) = prefs.iter().position(|p| p == loc)
                    && self.best_rank.map(|r| rank < r).unwrap_or(true)
                {
                    self.best_rank = Some(rank);
                    self.best_value = Some(value);
                }
            }
        }
    }

    fn resolve(self) -> Option<String> {
        self.best_value.or(self.default)
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn split_list(v: &str) -> Vec<String> {
    // Spec uses ';' separated lists, often ending with ';'
    v.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn split_key_locale(key: &str) -> (&str, Option<&str>) {
    // "Name[fr_FR]" => ("Name", Some("fr_FR"))
    let Some((base, rest)) = key.split_once('[') else {
        return (key, None);
    };
    match rest.strip_suffix(']') {
        Some(loc) if !loc.is_empty() => (base, Some(loc)),
        _ => (key, None),
    }
}

/// Locale preference list: LC_ALL > LC_MESSAGES > LANG, exact locale
/// first, then the bare language part (fr_FR -> fr).
pub fn preferred_locales() -> Vec<String> {
    fn clean_locale(s: &str) -> Option<String> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        // drop encoding and modifiers: fr_FR.UTF-8@euro => fr_FR
        let s = s.split('.').next().unwrap_or(s);
        let s = s.split('@').next().unwrap_or(s);
        if s.is_empty() { None } else { Some(s.to_string()) }
    }

    let raw = std::env::var("LC_ALL")
        .ok()
        .and_then(|s| clean_locale(&s))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|s| clean_locale(&s))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|s| clean_locale(&s)));

    let Some(loc) = raw else {
        return Vec::new();
    };

    let mut ordered = vec![loc.clone()];
    if let Some((lang, _)) = loc.split_once('_')
        && !lang.is_empty()
        && !ordered.contains(&lang.to_string())
    {
        ordered.push(lang.to_string());
    }
    if let Some((lang, _)) = loc.split_once('-')
        && !lang.is_empty()
        && !ordered.contains(&lang.to_string())
    {
        ordered.push(lang.to_string());
    }

    ordered
}

/// Desktop environments from $XDG_CURRENT_DESKTOP, used for the
/// OnlyShowIn/NotShowIn visibility check.
pub fn current_desktops() -> Vec<String> {
    std::env::var("XDG_CURRENT_DESKTOP")
        .map(|v| {
            v.split(':')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Unescape a desktop-file value: \s \n \t \r \\ per the spec.
/// Anything else after a backslash is a hard parse error.
fn unescape_value(raw: &str, path: &Path) -> Result<String, ParseError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                return Err(ParseError::InvalidEscape {
                    path: path.to_path_buf(),
                    escape: other,
                });
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    path: path.to_path_buf(),
                    escape: '\0',
                });
            }
        }
    }
    Ok(out)
}

/// Desktop file parser. Owns a reusable line buffer so sequential
/// parses (a whole construction pass, a watch loop) do not reallocate
/// per line. Single-owner, never shared across threads.
#[derive(Default)]
pub struct DesktopParser {
    line: String,
    locale_prefs: Vec<String>,
    desktops: Vec<String>,
}

impl DesktopParser {
    pub fn new() -> Self {
        Self::with_env(preferred_locales(), current_desktops())
    }

    /// Explicit locale/desktop environment, mainly for tests.
    pub fn with_env(locale_prefs: Vec<String>, desktops: Vec<String>) -> Self {
        Self {
            line: String::new(),
            locale_prefs,
            desktops,
        }
    }

    pub fn parse(&mut self, path: &Path) -> Result<Outcome, ParseError> {
        let file = File::open(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        enum Section {
            None,
            DesktopEntry,
            Other,
        }

        let mut section = Section::None;
        let mut seen_main_section = false;

        let mut name = LocalizedField::default();
        let mut generic_name = LocalizedField::default();
        let mut exec: Option<String> = None;
        let mut work_path: Option<String> = None;
        let mut terminal = false;
        let mut type_: Option<String> = None;
        let mut hidden = false;
        let mut nodisplay = false;
        let mut only_show_in: Vec<String> = Vec::new();
        let mut not_show_in: Vec<String> = Vec::new();

        loop {
            self.line.clear();
            let n = reader
                .read_line(&mut self.line)
                .map_err(|source| ParseError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }

            let line = self.line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                if line == "[Desktop Entry]" {
                    section = Section::DesktopEntry;
                    seen_main_section = true;
                } else {
                    section = Section::Other;
                }
                continue;
            }

            if !matches!(section, Section::DesktopEntry) {
                continue;
            }

            let Some((key_raw, value_raw)) = line.split_once('=') else {
                continue;
            };

            let key_raw = key_raw.trim();
            let value = value_raw.trim();
            if key_raw.is_empty() {
                continue;
            }

            let (key, locale) = split_key_locale(key_raw);

            match key {
                "Name" => name.set(locale, unescape_value(value, path)?, &self.locale_prefs),
                "GenericName" => {
                    generic_name.set(locale, unescape_value(value, path)?, &self.locale_prefs)
                }
                "Exec" => {
                    if locale.is_none() {
                        exec = Some(value.to_string());
                    }
                }
                "Path" => {
                    if locale.is_none() {
                        work_path = Some(value.to_string());
                    }
                }
                "Terminal" => {
                    if locale.is_none() {
                        terminal = parse_bool(value).unwrap_or(false);
                    }
                }
                "Type" => {
                    if locale.is_none() {
                        type_ = Some(value.to_string());
                    }
                }
                "Hidden" => {
                    if locale.is_none() {
                        hidden = parse_bool(value).unwrap_or(false);
                    }
                }
                "NoDisplay" => {
                    if locale.is_none() {
                        nodisplay = parse_bool(value).unwrap_or(false);
                    }
                }
                "OnlyShowIn" => {
                    if locale.is_none() {
                        only_show_in = split_list(value);
                    }
                }
                "NotShowIn" => {
                    if locale.is_none() {
                        not_show_in = split_list(value);
                    }
                }
                _ => {}
            }
        }

        if !seen_main_section {
            return Err(ParseError::MissingSection(path.to_path_buf()));
        }

        // Visibility policy lives here, not in the index: the index
        // only ever sees App or Disabled.
        if hidden || nodisplay {
            return Ok(Outcome::Disabled);
        }
        if let Some(t) = &type_
            && t.as_str() != "Application"
        {
            return Ok(Outcome::Disabled);
        }
        if !only_show_in.is_empty() && !only_show_in.iter().any(|d| self.desktops.contains(d)) {
            return Ok(Outcome::Disabled);
        }
        if not_show_in.iter().any(|d| self.desktops.contains(d)) {
            return Ok(Outcome::Disabled);
        }

        let name = name
            .resolve()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ParseError::MissingName(path.to_path_buf()))?;

        Ok(Outcome::App(ApplicationRecord {
            name,
            generic_name: generic_name.resolve().unwrap_or_default(),
            exec: exec.unwrap_or_default(),
            path: work_path.filter(|s| !s.is_empty()),
            terminal,
            location: path.to_path_buf(),
        }))
    }
}

/// One-shot convenience wrapper around `DesktopParser`.
pub fn parse_desktop_file(path: &Path) -> Result<Outcome, ParseError> {
    DesktopParser::new().parse(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write desktop file");
        path
    }

    fn test_parser() -> DesktopParser {
        DesktopParser::with_env(Vec::new(), vec!["Sway".to_string()])
    }

    #[test]
    fn id_replaces_separators_and_keeps_suffix() {
        let base = Path::new("/usr/share/applications");
        let id = desktop_entry_id(Path::new("/usr/share/applications/foo/bar.desktop"), base)
            .expect("derive id");
        assert_eq!(id, "foo-bar.desktop");

        let id = desktop_entry_id(
            Path::new("/usr/share/applications/org.foo.bar.desktop"),
            base,
        )
        .expect("derive id");
        assert_eq!(id, "org.foo.bar.desktop");
    }

    #[test]
    fn id_rejects_paths_outside_the_base() {
        let err = desktop_entry_id(
            Path::new("/opt/apps/foo.desktop"),
            Path::new("/usr/share/applications"),
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::OutsideRoot { .. }));
    }

    #[test]
    fn parses_basic_fields() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(
            &dir,
            "ff.desktop",
            "[Desktop Entry]\nType=Application\nName=Firefox\nGenericName=Web browser\n\
             Exec=firefox %u\nPath=/tmp\nTerminal=false\n",
        );

        let out = test_parser().parse(&path).expect("parse");
        let Outcome::App(app) = out else {
            panic!("expected App outcome");
        };
        assert_eq!(app.name, "Firefox");
        assert_eq!(app.generic_name, "Web browser");
        assert_eq!(app.exec, "firefox %u");
        assert_eq!(app.path.as_deref(), Some("/tmp"));
        assert!(!app.terminal);
        assert_eq!(app.location, path);
    }

    #[test]
    fn ignores_keys_outside_the_main_section() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(
            &dir,
            "a.desktop",
            "[Desktop Entry]\nName=Real\n[Desktop Action new]\nName=Shadow\nExec=x --new\n",
        );

        let Outcome::App(app) = test_parser().parse(&path).expect("parse") else {
            panic!("expected App outcome");
        };
        assert_eq!(app.name, "Real");
        assert_eq!(app.exec, "");
    }

    #[test]
    fn hidden_and_nodisplay_are_disabled() {
        let dir = TempDir::new().expect("tempdir");
        for key in ["Hidden", "NoDisplay"] {
            let path = write_file(
                &dir,
                &format!("{key}.desktop"),
                &format!("[Desktop Entry]\nName=App\n{key}=true\n"),
            );
            let out = test_parser().parse(&path).expect("parse");
            assert!(matches!(out, Outcome::Disabled), "{key} should disable");
        }
    }

    #[test]
    fn show_in_lists_respect_current_desktop() {
        let dir = TempDir::new().expect("tempdir");

        let path = write_file(
            &dir,
            "only.desktop",
            "[Desktop Entry]\nName=App\nOnlyShowIn=GNOME;KDE;\n",
        );
        assert!(matches!(
            test_parser().parse(&path).expect("parse"),
            Outcome::Disabled
        ));

        let path = write_file(
            &dir,
            "not.desktop",
            "[Desktop Entry]\nName=App\nNotShowIn=Sway;\n",
        );
        assert!(matches!(
            test_parser().parse(&path).expect("parse"),
            Outcome::Disabled
        ));

        let path = write_file(
            &dir,
            "ok.desktop",
            "[Desktop Entry]\nName=App\nOnlyShowIn=Sway;\n",
        );
        assert!(matches!(
            test_parser().parse(&path).expect("parse"),
            Outcome::App(_)
        ));
    }

    #[test]
    fn non_application_type_is_disabled() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(
            &dir,
            "link.desktop",
            "[Desktop Entry]\nType=Link\nName=Homepage\nURL=https://example.org\n",
        );
        assert!(matches!(
            test_parser().parse(&path).expect("parse"),
            Outcome::Disabled
        ));
    }

    #[test]
    fn values_are_unescaped() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(
            &dir,
            "esc.desktop",
            "[Desktop Entry]\nName=Tab\\there\\sand\\\\slash\n",
        );
        let Outcome::App(app) = test_parser().parse(&path).expect("parse") else {
            panic!("expected App outcome");
        };
        assert_eq!(app.name, "Tab\there and\\slash");
    }

    #[test]
    fn invalid_escape_is_a_hard_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(&dir, "bad.desktop", "[Desktop Entry]\nName=Oops\\q\n");
        let err = test_parser().parse(&path).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEscape { escape: 'q', .. }));
    }

    #[test]
    fn missing_name_is_a_hard_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(&dir, "noname.desktop", "[Desktop Entry]\nExec=x\n");
        let err = test_parser().parse(&path).unwrap_err();
        assert!(matches!(err, ParseError::MissingName(_)));
    }

    #[test]
    fn missing_main_section_is_a_hard_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(&dir, "empty.desktop", "# just a comment\n");
        let err = test_parser().parse(&path).unwrap_err();
        assert!(matches!(err, ParseError::MissingSection(_)));
    }

    #[test]
    fn localized_name_beats_default_when_preferred() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_file(
            &dir,
            "loc.desktop",
            "[Desktop Entry]\nName=Files\nName[fr_FR]=Fichiers\nName[fr]=Dossiers\n",
        );

        let mut parser = DesktopParser::with_env(
            vec!["fr_FR".to_string(), "fr".to_string()],
            Vec::new(),
        );
        let Outcome::App(app) = parser.parse(&path).expect("parse") else {
            panic!("expected App outcome");
        };
        assert_eq!(app.name, "Fichiers");

        let mut parser = DesktopParser::with_env(vec!["de".to_string()], Vec::new());
        let Outcome::App(app) = parser.parse(&path).expect("parse") else {
            panic!("expected App outcome");
        };
        assert_eq!(app.name, "Files");
    }

    #[test]
    fn search_groups_follow_root_order() {
        let dir = TempDir::new().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(a.join("nested")).expect("mkdir");
        fs::create_dir_all(&b).expect("mkdir");
        fs::write(a.join("nested/x.desktop"), "").expect("write");
        fs::write(a.join("y.desktop"), "").expect("write");
        fs::write(b.join("z.desktop"), "").expect("write");
        fs::write(b.join("ignored.txt"), "").expect("write");

        let groups = build_search_groups(&[a.clone(), b.clone()]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].base, a);
        assert_eq!(
            groups[0].files,
            vec![a.join("nested/x.desktop"), a.join("y.desktop")]
        );
        assert_eq!(groups[1].files, vec![b.join("z.desktop")]);
    }
}
