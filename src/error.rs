use std::path::PathBuf;
use thiserror::Error;

/// Hard parse failure. "Disabled" is not an error; the parser reports
/// it as a regular outcome and the index skips the file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` has no [Desktop Entry] section", .0.display())]
    MissingSection(PathBuf),

    #[error("`{}` has no Name= key", .0.display())]
    MissingName(PathBuf),

    #[error("invalid escape `\\{escape}` in `{}`", .path.display())]
    InvalidEscape { path: PathBuf, escape: char },
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// More search-directory groups than the rank type can represent.
    #[error("too many search-directory groups for the rank type")]
    RankOverflow,

    #[error("`{}` is not under search root `{}`", .path.display(), .base.display())]
    OutsideRoot { path: PathBuf, base: PathBuf },
}
