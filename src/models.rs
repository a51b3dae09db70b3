use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Precedence of a search-directory group. Lower wins.
pub type Rank = u32;

/// Value data for one application, as extracted from a desktop file.
/// Carries no identity of its own; the entry store keys it by desktop
/// entry id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub name: String,
    /// Empty means "absent".
    pub generic_name: String,
    /// Raw Exec= line, field codes included. Empty if the file had none.
    pub exec: String,
    /// Working directory (Path= key), if any.
    pub path: Option<String>,
    pub terminal: bool,
    /// The file this record came from.
    pub location: PathBuf,
}

impl ApplicationRecord {
    /// The display string this record offers for the given slot.
    /// Empty string means "no string for this slot".
    pub fn display_name(&self, generic: bool) -> &str {
        if generic { &self.generic_name } else { &self.name }
    }
}

/// One search directory plus the desktop files found under it.
/// Position in a group list is the group's rank.
#[derive(Debug, Clone)]
pub struct SearchGroup {
    pub base: PathBuf,
    pub files: Vec<PathBuf>,
}
