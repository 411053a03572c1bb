//! Indexed documentation symbols.

use super::artifact::RawRecord;
use crate::search::normalize::{decode_entities, decode_key, split_scope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of documentation page a symbol links to, derived from the target page name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Class,
    Struct,
    Union,
    Interface,
    Enum,
    Namespace,
    Member,
    File,
    Group,
    Directory,
    Page,
    Other,
}

impl EntryKind {
    /// Classifies a target reference such as `../classchip_1_1_system_1_1_object.html`.
    pub fn from_target(target_ref: &str) -> Self {
        const PREFIXES: &[(&str, EntryKind)] = &[
            ("class", EntryKind::Class),
            ("struct", EntryKind::Struct),
            ("union", EntryKind::Union),
            ("interface", EntryKind::Interface),
            ("enum", EntryKind::Enum),
            ("namespace", EntryKind::Namespace),
            ("group__", EntryKind::Group),
            ("dir_", EntryKind::Directory),
        ];

        if target_ref.contains('#') {
            return Self::Member;
        }

        let page = target_ref.rsplit('/').next().unwrap_or(target_ref);
        let stem = page.strip_suffix(".html").unwrap_or(page);

        if let Some((_, kind)) = PREFIXES.iter().find(|(prefix, _)| stem.starts_with(*prefix)) {
            return *kind;
        }

        // Generators escape the dot of a file name as `_8`: `object_8h`, `main_8cpp`.
        if stem.contains("_8") {
            Self::File
        } else if page.ends_with(".html") {
            Self::Page
        } else {
            Self::Other
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Member => "member",
            Self::File => "file",
            Self::Group => "group",
            Self::Directory => "directory",
            Self::Page => "page",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One searchable documentation symbol and its link target.
///
/// Unique by `(key, target_ref)`: template specializations that share a display name
/// but link elsewhere are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Normalized lowercase search key
    pub key: String,
    /// Name as shown to the user, entities decoded
    pub display_name: String,
    /// Namespace/class nesting, outermost first
    pub scope_path: Vec<String>,
    /// Scope exactly as the generator wrote it
    pub scope_label: String,
    /// Relative URL (with optional anchor) of the documentation page
    pub target_ref: String,
    pub kind: EntryKind,
    /// `false` when the link points into another site via a tag file
    pub local: bool,
    /// Generator serial number from the raw key
    pub serial: Option<u32>,
    /// Position in load order
    pub ordinal: usize,
}

impl Entry {
    /// Expands a raw record into one entry per link target.
    pub(crate) fn from_record(record: &RawRecord) -> impl Iterator<Item = Self> + '_ {
        let decoded = decode_key(&record.key);
        let display_name = decode_entities(&record.display_name).into_owned();

        record.targets.iter().map(move |target| Self {
            key: decoded.key.clone(),
            display_name: display_name.clone(),
            scope_path: split_scope(&target.scope_label),
            scope_label: target.scope_label.clone(),
            target_ref: target.target_ref.clone(),
            kind: EntryKind::from_target(&target.target_ref),
            local: target.local,
            serial: decoded.serial,
            ordinal: 0,
        })
    }

    /// Key length in characters, the primary ranking criterion.
    pub fn key_len(&self) -> usize {
        self.key.chars().count()
    }

    /// Fully qualified display path, e.g. `chip::System::ObjectPool`.
    pub fn qualified_name(&self) -> String {
        if self.scope_path.is_empty() {
            self.display_name.clone()
        } else if self.scope_path.last() == Some(&self.display_name) {
            // Some generators repeat the symbol itself as the last scope segment.
            self.scope_path.join("::")
        } else {
            format!("{}::{}", self.scope_path.join("::"), self.display_name)
        }
    }
}
