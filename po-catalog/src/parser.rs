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

//! Group classified lines into a [`Document`].

use crate::document::{
    Comments, CountableEntry, DirectEntry, Document, Entry, FileKind, SourceKind,
};
use crate::error::{LexError, Result, StructuralError};
use crate::lexer::{Keyword, Lexer, Line, LineKind};
use crate::metadata::Metadata;
use std::collections::{BTreeMap, HashSet};

/// Parse the text of a PO or POT file.
///
/// The first entry is taken as the header if its `msgid` is empty.
/// Entries must be unique by context and `msgid`, counting obsolete
/// entries separately. Parsing stops at the first error; no partial
/// document is returned.
///
/// # Examples
///
/// ```
/// use po_catalog::{parse, FileKind, SourceKind};
///
/// let document = parse("#: foo.c:10\nmsgid \"Hello\"\nmsgstr \"\"\n", FileKind::Pot).unwrap();
/// let entry = document.direct_entries().next().unwrap();
/// assert_eq!(entry.msgid, "Hello");
/// assert_eq!(entry.comments.source_reference_comments, ["foo.c:10"]);
/// assert_eq!(document.source_kind, SourceKind::C);
/// ```
pub fn parse(text: &str, file_kind: FileKind) -> Result<Document> {
    let mut collector = Collector::new(file_kind);
    let mut builder = EntryBuilder::default();

    for line in Lexer::new(text) {
        let line = line?;
        if let Some((start, parsed)) = builder.push(line)? {
            collector.add(start, parsed)?;
        }
    }

    match builder.finish()? {
        Some((start, parsed)) => collector.add(start, parsed)?,
        None if !collector.seen_entry => collector.set_header_comments(builder.comments),
        None => collector.document.trailing_comments = builder.comments,
    }

    let mut document = collector.document;
    document.source_kind = infer_source_kind(&document);
    Ok(document)
}

/// Places parsed entries into a document.
struct Collector {
    document: Document,
    seen_entry: bool,
    /// `(obsolete, msgctxt, msgid)` of every entry so far.
    keys: HashSet<(bool, Option<String>, String)>,
}

impl Collector {
    fn new(file_kind: FileKind) -> Self {
        Self {
            document: Document::new(file_kind),
            seen_entry: false,
            keys: HashSet::new(),
        }
    }

    fn add(&mut self, start: usize, parsed: ParsedEntry) -> Result<()> {
        let first = !std::mem::replace(&mut self.seen_entry, true);
        let entry = match parsed {
            ParsedEntry::Direct(entry) if first && is_header(&entry) => {
                tracing::debug!("Found header with {} bytes", entry.msgstr.len());
                self.document.header = Metadata::from_msgstr(&entry.msgstr);
                self.set_header_comments(entry.comments);
                return Ok(());
            }
            ParsedEntry::Direct(entry) => Entry::Direct(entry),
            ParsedEntry::Countable(entry) => Entry::Countable(entry),
        };

        let key = (
            entry.is_obsolete(),
            entry.msgctxt().map(String::from),
            entry.msgid().to_owned(),
        );
        if !self.keys.insert(key) {
            return Err(StructuralError::DuplicateEntry { line: start }.into());
        }
        self.document.entries.push(entry);
        Ok(())
    }

    fn set_header_comments(&mut self, comments: Comments) {
        let Comments {
            translator_comments,
            source_reference_comments,
            flags_comments,
            previous_string_comments,
        } = comments;
        self.document.leading_comments = translator_comments;
        self.document.header_references = source_reference_comments;
        self.document.header_flags = flags_comments;
        self.document.header_previous_strings = previous_string_comments;
    }
}

fn is_header(entry: &DirectEntry) -> bool {
    entry.msgid.is_empty() && entry.msgctxt.is_none() && !entry.is_obsolete
}

/// The first entry with source references decides: references to
/// `.c` or `.h` files mean C-level messages.
fn infer_source_kind(document: &Document) -> SourceKind {
    let Some(references) = document
        .entries
        .iter()
        .map(|entry| &entry.comments().source_reference_comments)
        .find(|references| !references.is_empty())
    else {
        return SourceKind::R;
    };

    let is_c = references.iter().any(|reference| {
        let path = reference.split(':').next().unwrap_or(reference);
        path.ends_with(".c") || path.ends_with(".h")
    });
    let kind = if is_c { SourceKind::C } else { SourceKind::R };
    tracing::debug!("Inferred {kind:?} source kind from {references:?}");
    kind
}

enum ParsedEntry {
    Direct(DirectEntry),
    Countable(CountableEntry),
}

/// The string which a continuation line extends.
#[derive(Debug, Copy, Clone)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    PluralMsgstr(usize),
}

#[derive(Default)]
struct EntryBuilder {
    comments: Comments,
    /// Line of the first keyword.
    start: Option<usize>,
    obsolete: bool,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    plural_msgstr: BTreeMap<usize, String>,
    last: Option<Field>,
}

impl EntryBuilder {
    fn has_keywords(&self) -> bool {
        self.start.is_some()
    }

    fn has_msgstr(&self) -> bool {
        self.msgstr.is_some() || !self.plural_msgstr.is_empty()
    }

    /// Feed one line. Returns the previous entry and its first line
    /// number when `line` ends it.
    fn push(&mut self, line: Line) -> Result<Option<(usize, ParsedEntry)>> {
        let Line {
            number,
            obsolete,
            kind,
        } = line;

        let starts_entry = match &kind {
            LineKind::Blank if self.has_keywords() => return self.finish(),
            LineKind::Blank => return Ok(None),
            LineKind::TranslatorComment(_)
            | LineKind::SourceRefComment(_)
            | LineKind::FlagsComment(_)
            | LineKind::PreviousStringComment(_) => self.has_keywords(),
            LineKind::KeywordString { keyword, .. } => match keyword {
                Keyword::Msgctxt => self.has_keywords(),
                Keyword::Msgid => self.msgid.is_some(),
                _ => false,
            },
            LineKind::Continuation(_) => false,
        };
        let finished = if starts_entry { self.finish()? } else { None };

        match kind {
            LineKind::Blank => {}
            LineKind::TranslatorComment(text) => self.comments.translator_comments.push(text),
            LineKind::SourceRefComment(text) => self
                .comments
                .source_reference_comments
                .extend(text.split_whitespace().map(String::from)),
            LineKind::FlagsComment(text) => self.comments.flags_comments.extend(
                text.split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(String::from),
            ),
            LineKind::PreviousStringComment(text) => {
                self.comments.previous_string_comments.push(text)
            }
            LineKind::KeywordString { keyword, value } => {
                self.mark_obsolete(number, obsolete)?;
                self.add_keyword(number, keyword, value)?;
            }
            LineKind::Continuation(value) => {
                self.mark_obsolete(number, obsolete)?;
                self.extend_last(number, &value)?;
            }
        }
        Ok(finished)
    }

    fn mark_obsolete(&mut self, number: usize, obsolete: bool) -> Result<()> {
        if self.start.is_none() {
            self.start = Some(number);
            self.obsolete = obsolete;
        } else if self.obsolete != obsolete {
            return Err(StructuralError::InconsistentObsoleteMarking { line: number }.into());
        }
        Ok(())
    }

    fn add_keyword(&mut self, number: usize, keyword: Keyword, value: String) -> Result<()> {
        let missing_msgid = StructuralError::MissingMsgid { line: number };
        let repeated = |keyword| StructuralError::RepeatedKeyword {
            line: number,
            keyword,
        };
        let field = match keyword {
            Keyword::Msgctxt => {
                self.msgctxt = Some(value);
                Field::Msgctxt
            }
            Keyword::Msgid => {
                self.msgid = Some(value);
                Field::Msgid
            }
            Keyword::MsgidPlural => {
                if self.msgid.is_none() {
                    return Err(missing_msgid.into());
                }
                if self.msgid_plural.is_some() {
                    return Err(repeated("msgid_plural").into());
                }
                if self.has_msgstr() {
                    return Err(StructuralError::MismatchedMsgstr { line: number }.into());
                }
                self.msgid_plural = Some(value);
                Field::MsgidPlural
            }
            Keyword::Msgstr(None) => {
                if self.msgid.is_none() {
                    return Err(missing_msgid.into());
                }
                if self.msgstr.is_some() {
                    return Err(repeated("msgstr").into());
                }
                if self.msgid_plural.is_some() || !self.plural_msgstr.is_empty() {
                    return Err(StructuralError::MismatchedMsgstr { line: number }.into());
                }
                self.msgstr = Some(value);
                Field::Msgstr
            }
            Keyword::Msgstr(Some(index)) => {
                if self.msgid.is_none() {
                    return Err(missing_msgid.into());
                }
                if self.msgid_plural.is_none() || self.msgstr.is_some() {
                    return Err(StructuralError::MismatchedMsgstr { line: number }.into());
                }
                if self.plural_msgstr.insert(index, value).is_some() {
                    return Err(StructuralError::DuplicateMsgstrIndex {
                        line: number,
                        index,
                    }
                    .into());
                }
                Field::PluralMsgstr(index)
            }
        };
        self.last = Some(field);
        Ok(())
    }

    fn extend_last(&mut self, number: usize, value: &str) -> Result<()> {
        let target = match self.last {
            Some(Field::Msgctxt) => self.msgctxt.as_mut(),
            Some(Field::Msgid) => self.msgid.as_mut(),
            Some(Field::MsgidPlural) => self.msgid_plural.as_mut(),
            Some(Field::Msgstr) => self.msgstr.as_mut(),
            Some(Field::PluralMsgstr(index)) => self.plural_msgstr.get_mut(&index),
            None => None,
        };
        match target {
            Some(target) => {
                target.push_str(value);
                Ok(())
            }
            None => Err(LexError::UnrecognizedLine { line: number }.into()),
        }
    }

    /// Complete the current entry and reset the builder.
    ///
    /// Returns `None` if no keyword line has been seen; pending
    /// comments are then kept for the next entry.
    fn finish(&mut self) -> Result<Option<(usize, ParsedEntry)>> {
        let Some(start) = self.start else {
            return Ok(None);
        };
        let builder = std::mem::take(self);

        let msgid = builder
            .msgid
            .ok_or(StructuralError::MissingMsgid { line: start })?;

        let entry = match builder.msgid_plural {
            Some(msgid_plural) => {
                if builder.plural_msgstr.is_empty() {
                    return Err(StructuralError::MissingMsgstr { line: start }.into());
                }
                let mut msgstr = Vec::with_capacity(builder.plural_msgstr.len());
                for (expected, (index, value)) in builder.plural_msgstr.into_iter().enumerate() {
                    if index != expected {
                        return Err(StructuralError::MsgstrIndexGap {
                            line: start,
                            index: expected,
                        }
                        .into());
                    }
                    msgstr.push(value);
                }
                ParsedEntry::Countable(CountableEntry {
                    msgctxt: builder.msgctxt,
                    msgid,
                    msgid_plural,
                    msgstr,
                    is_obsolete: builder.obsolete,
                    comments: builder.comments,
                })
            }
            None => ParsedEntry::Direct(DirectEntry {
                msgctxt: builder.msgctxt,
                msgid,
                msgstr: builder
                    .msgstr
                    .ok_or(StructuralError::MissingMsgstr { line: start })?,
                is_obsolete: builder.obsolete,
                comments: builder.comments,
            }),
        };
        Ok(Some((start, entry)))
    }
}
