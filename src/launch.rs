use crate::models::ApplicationRecord;
use std::{env, path::Path, process::Command};

#[derive(Debug, Clone, Copy)]
pub enum Terminal {
    Foot,
    Kitty,
    Alacritty,
    WezTerm,
}

pub fn pick_terminal() -> Option<Terminal> {
    // Keep this deterministic and simple.
    if is_executable_in_path("foot") {
        return Some(Terminal::Foot);
    }
    if is_executable_in_path("kitty") {
        return Some(Terminal::Kitty);
    }
    if is_executable_in_path("alacritty") {
        return Some(Terminal::Alacritty);
    }
    if is_executable_in_path("wezterm") {
        return Some(Terminal::WezTerm);
    }

    None
}

/// Turn an Exec= line plus leftover user arguments into an argv.
/// Field codes (%f, %u, ...) are dropped; the user's arguments go at
/// the end instead.
pub fn exec_to_argv(exec_line: &str, args: &[String]) -> Vec<String> {
    let Some(tokens) = shlex::split(exec_line) else {
        return Vec::new();
    };

    let mut argv: Vec<String> = tokens
        .into_iter()
        .filter_map(|t| {
            if is_field_code_token(&t) {
                return None;
            }

            // Best-effort: strip field codes embedded in an arg
            // Example: "--foo=%u" -> "--foo="
            if t.contains('%') {
                return Some(strip_field_codes(&t));
            }

            Some(t)
        })
        .filter(|t| !t.is_empty())
        .collect();

    argv.extend(args.iter().cloned());
    argv
}

/// Spawn the application, wrapping in a terminal emulator when the
/// record asks for one and honoring its Path= working directory.
pub fn spawn_app(app: &ApplicationRecord, args: &[String]) -> Result<(), String> {
    if app.exec.is_empty() {
        return Err(format!("no Exec= line for `{}`", app.name));
    }

    let argv = exec_to_argv(&app.exec, args);
    if argv.is_empty() {
        return Err(format!(
            "Exec parsed empty for `{}` (Exec={})",
            app.name, app.exec
        ));
    }

    let mut cmd = if app.terminal {
        let term = pick_terminal().ok_or_else(|| {
            "no known terminal found for a Terminal=true app. \
             Install one of: foot, kitty, alacritty, wezterm"
                .to_string()
        })?;
        terminal_command(term, &argv)
    } else {
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        cmd
    };

    if let Some(dir) = &app.path {
        cmd.current_dir(dir);
    }

    cmd.spawn()
        .map_err(|e| format!("failed to launch `{}`: {e}", app.name))?;

    Ok(())
}

fn terminal_command(term: Terminal, argv: &[String]) -> Command {
    match term {
        Terminal::Foot => {
            let mut cmd = Command::new("foot");
            cmd.arg("-e").args(argv);
            cmd
        }
        Terminal::Kitty => {
            let mut cmd = Command::new("kitty");
            cmd.args(argv);
            cmd
        }
        Terminal::Alacritty => {
            let mut cmd = Command::new("alacritty");
            cmd.arg("-e").args(argv);
            cmd
        }
        Terminal::WezTerm => {
            let mut cmd = Command::new("wezterm");
            cmd.args(["start", "--"]).args(argv);
            cmd
        }
    }
}

fn is_field_code_token(t: &str) -> bool {
    matches!(
        t,
        "%f" | "%F" | "%u" | "%U" | "%d" | "%D" | "%n" | "%N" | "%i" | "%c" | "%k" | "%v" | "%m"
    )
}

fn strip_field_codes(s: &str) -> String {
    // Minimal: remove any occurrences of %<char>.
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '%' {
            // Skip next char if present (the code), or keep '%' if it's the end.
            if chars.peek().is_some() {
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }

    out
}

fn is_executable_in_path(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let Some(path_os) = env::var_os("PATH") else {
        return false;
    };

    for dir in env::split_paths(&path_os) {
        if dir.as_os_str().is_empty() {
            continue;
        }

        let candidate = dir.join(name);
        if is_executable_file(&candidate) {
            return true;
        }
    }

    false
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };

    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode();
        mode & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        // Best-effort for non-unix.
        true
    }
}
