// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory model of a PO or POT file.

use crate::metadata::Metadata;
use serde::Serialize;
use std::path::Path;

/// Whether a catalog is a translation or a template.
///
/// The two are indistinguishable from their content, so the kind is
/// always supplied by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Po,
    Pot,
}

impl FileKind {
    /// Guess the kind from a file name: `.pot` files are templates,
    /// everything else is a translation.
    pub fn from_path(path: &Path) -> FileKind {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("pot") => FileKind::Pot,
            _ => FileKind::Po,
        }
    }
}

/// The layer which produced the messages of a catalog.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    /// Messages extracted from R code.
    #[default]
    R,
    /// Messages extracted from C code.
    C,
}

/// Comments attached to an entry, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comments {
    /// Text of `#` comments. Comments with a marker, such as `#.`,
    /// keep the marker as their first character.
    pub translator_comments: Vec<String>,
    /// One `path:line` reference per element.
    pub source_reference_comments: Vec<String>,
    /// One flag per element, such as `fuzzy` or `c-format`.
    pub flags_comments: Vec<String>,
    /// Text of `#|` comments.
    pub previous_string_comments: Vec<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.translator_comments.is_empty()
            && self.source_reference_comments.is_empty()
            && self.flags_comments.is_empty()
            && self.previous_string_comments.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags_comments.iter().any(|f| f == flag)
    }
}

/// A message without plural forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgstr: String,
    pub is_obsolete: bool,
    pub comments: Comments,
}

/// A message with plural forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountableEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: String,
    /// The translation for each plural form index.
    pub msgstr: Vec<String>,
    pub is_obsolete: bool,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Entry {
    Direct(DirectEntry),
    Countable(CountableEntry),
}

impl Entry {
    pub fn msgctxt(&self) -> Option<&str> {
        match self {
            Entry::Direct(entry) => entry.msgctxt.as_deref(),
            Entry::Countable(entry) => entry.msgctxt.as_deref(),
        }
    }

    pub fn msgid(&self) -> &str {
        match self {
            Entry::Direct(entry) => &entry.msgid,
            Entry::Countable(entry) => &entry.msgid,
        }
    }

    pub fn is_obsolete(&self) -> bool {
        match self {
            Entry::Direct(entry) => entry.is_obsolete,
            Entry::Countable(entry) => entry.is_obsolete,
        }
    }

    pub fn comments(&self) -> &Comments {
        match self {
            Entry::Direct(entry) => &entry.comments,
            Entry::Countable(entry) => &entry.comments,
        }
    }

    pub fn comments_mut(&mut self) -> &mut Comments {
        match self {
            Entry::Direct(entry) => &mut entry.comments,
            Entry::Countable(entry) => &mut entry.comments,
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.comments().has_flag("fuzzy")
    }

    /// At least one translation is non-empty.
    pub fn is_translated(&self) -> bool {
        match self {
            Entry::Direct(entry) => !entry.msgstr.is_empty(),
            Entry::Countable(entry) => entry.msgstr.iter().any(|msgstr| !msgstr.is_empty()),
        }
    }

    /// Empty every translation. Countable entries are resized to
    /// `nplurals` forms when given.
    pub fn clear_translations(&mut self, nplurals: Option<usize>) {
        match self {
            Entry::Direct(entry) => entry.msgstr.clear(),
            Entry::Countable(entry) => {
                let count = nplurals.unwrap_or(entry.msgstr.len());
                entry.msgstr = vec![String::new(); count];
            }
        }
    }
}

impl From<DirectEntry> for Entry {
    fn from(entry: DirectEntry) -> Self {
        Entry::Direct(entry)
    }
}

impl From<CountableEntry> for Entry {
    fn from(entry: CountableEntry) -> Self {
        Entry::Countable(entry)
    }
}

/// A parsed catalog.
///
/// Direct and countable entries share one sequence so that their
/// relative order survives a round trip; [`Document::direct_entries`]
/// and [`Document::countable_entries`] give the per-kind views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub source_kind: SourceKind,
    pub file_kind: FileKind,
    /// Comments in front of the header entry.
    pub leading_comments: Vec<String>,
    /// Flags on the header entry, typically `fuzzy` in templates.
    pub header_flags: Vec<String>,
    /// `#:` references in front of the header entry.
    pub header_references: Vec<String>,
    /// `#|` comments in front of the header entry.
    pub header_previous_strings: Vec<String>,
    pub header: Metadata,
    pub entries: Vec<Entry>,
    /// Comments after the last entry.
    pub trailing_comments: Comments,
}

impl Document {
    pub fn new(file_kind: FileKind) -> Self {
        Self {
            source_kind: SourceKind::default(),
            file_kind,
            leading_comments: Vec::new(),
            header_flags: Vec::new(),
            header_references: Vec::new(),
            header_previous_strings: Vec::new(),
            header: Metadata::new(),
            entries: Vec::new(),
            trailing_comments: Comments::default(),
        }
    }

    pub fn direct_entries(&self) -> impl Iterator<Item = &DirectEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Direct(entry) => Some(entry),
            Entry::Countable(_) => None,
        })
    }

    pub fn countable_entries(&self) -> impl Iterator<Item = &CountableEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Countable(entry) => Some(entry),
            Entry::Direct(_) => None,
        })
    }

    /// Find the entry with the given context and `msgid`.
    pub fn find(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.msgctxt() == msgctxt && entry.msgid() == msgid)
    }

    /// The header entry has something worth writing.
    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
            || !self.leading_comments.is_empty()
            || !self.header_flags.is_empty()
            || !self.header_references.is_empty()
            || !self.header_previous_strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn countable(msgstr: &[&str]) -> Entry {
        Entry::Countable(CountableEntry {
            msgid: String::from("file"),
            msgid_plural: String::from("files"),
            msgstr: msgstr.iter().map(|s| s.to_string()).collect(),
            ..CountableEntry::default()
        })
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path(Path::new("po/R-foo.pot")), FileKind::Pot);
        assert_eq!(FileKind::from_path(Path::new("po/de.po")), FileKind::Po);
        assert_eq!(FileKind::from_path(Path::new("messages")), FileKind::Po);
    }

    #[test]
    fn test_is_translated() {
        assert!(!countable(&["", ""]).is_translated());
        assert!(countable(&["", "Dateien"]).is_translated());
        let direct = Entry::Direct(DirectEntry {
            msgid: String::from("Hello"),
            msgstr: String::from("Hallo"),
            ..DirectEntry::default()
        });
        assert!(direct.is_translated());
    }

    #[test]
    fn test_clear_translations_resizes() {
        let mut entry = countable(&["Datei", "Dateien"]);
        entry.clear_translations(Some(3));
        assert_eq!(entry, countable(&["", "", ""]));

        let mut entry = countable(&["Datei", "Dateien"]);
        entry.clear_translations(None);
        assert_eq!(entry, countable(&["", ""]));
    }

    #[test]
    fn test_entry_views() {
        let mut document = Document::new(FileKind::Pot);
        document.entries.push(
            DirectEntry {
                msgid: String::from("a"),
                ..DirectEntry::default()
            }
            .into(),
        );
        document.entries.push(countable(&["", ""]));
        document.entries.push(
            DirectEntry {
                msgctxt: Some(String::from("menu")),
                msgid: String::from("a"),
                ..DirectEntry::default()
            }
            .into(),
        );

        assert_eq!(document.direct_entries().count(), 2);
        assert_eq!(document.countable_entries().count(), 1);
        assert_eq!(
            document.find(Some("menu"), "a").and_then(Entry::msgctxt),
            Some("menu")
        );
        assert!(document.find(None, "file").is_some());
        assert!(document.find(None, "missing").is_none());
    }
}
