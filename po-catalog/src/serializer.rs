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

//! Write a [`Document`] back to PO text.
//!
//! Strings are written on a single line each; the wrapping of the
//! original file is not reproduced. The header is the exception: its
//! fields are written one per continuation line, the way `xgettext`
//! and `msginit` lay them out.

use crate::document::{Comments, Document, Entry};
use crate::error::SerializeError;
use std::fmt::Write as _;

/// Width used when wrapping `#:` lines.
const REFERENCE_WIDTH: usize = 76;

/// Render `document` as PO text.
///
/// # Examples
///
/// ```
/// use po_catalog::{parse, serialize, FileKind};
///
/// let text = "msgid \"Hello\"\nmsgstr \"Hallo\"\n";
/// let document = parse(text, FileKind::Po).unwrap();
/// assert_eq!(serialize(&document).unwrap(), text);
/// ```
pub fn serialize(document: &Document) -> Result<String, SerializeError> {
    let mut blocks = Vec::with_capacity(document.entries.len() + 1);
    // An empty header is still needed when the first entry would be
    // mistaken for one.
    if document.has_header() || document.entries.first().is_some_and(looks_like_header) {
        blocks.push(header_block(document)?);
    }
    for entry in &document.entries {
        blocks.push(entry_block(entry)?);
    }
    if !document.trailing_comments.is_empty() {
        let mut block = String::new();
        push_comments(&mut block, &document.trailing_comments, false);
        blocks.push(block);
    }
    Ok(blocks.join("\n"))
}

/// Escape `text` for use inside a quoted PO string.
///
/// # Examples
///
/// ```
/// use po_catalog::serializer::escape;
///
/// assert_eq!(escape("say \"hi\"\n").unwrap(), r#"say \"hi\"\n"#);
/// assert!(escape("nul\0").is_err());
/// ```
pub fn escape(text: &str) -> Result<String, SerializeError> {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '\0' => {
                return Err(SerializeError::UnrepresentableValue {
                    value: text.to_owned(),
                })
            }
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{07}' => escaped.push_str("\\a"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0c}' => escaped.push_str("\\f"),
            '\u{0b}' => escaped.push_str("\\v"),
            _ => escaped.push(ch),
        }
    }
    Ok(escaped)
}

fn header_block(document: &Document) -> Result<String, SerializeError> {
    let mut block = String::new();
    for previous in &document.header_previous_strings {
        let _ = writeln!(block, "#| {previous}");
    }
    for comment in &document.leading_comments {
        push_translator_comment(&mut block, comment);
    }
    push_references(&mut block, &document.header_references);
    push_flags(&mut block, &document.header_flags);
    block.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (name, value) in document.header.iter() {
        let field = escape(&format!("{name}: {value}\n"))?;
        let _ = writeln!(block, "\"{field}\"");
    }
    Ok(block)
}

fn looks_like_header(entry: &Entry) -> bool {
    match entry {
        Entry::Direct(entry) => {
            entry.msgid.is_empty() && entry.msgctxt.is_none() && !entry.is_obsolete
        }
        Entry::Countable(_) => false,
    }
}

fn entry_block(entry: &Entry) -> Result<String, SerializeError> {
    let mut block = String::new();
    push_comments(&mut block, entry.comments(), entry.is_obsolete());

    let prefix = if entry.is_obsolete() { "#~ " } else { "" };
    let mut keyword = |name: &str, value: &str| -> Result<(), SerializeError> {
        let _ = writeln!(block, "{prefix}{name} \"{}\"", escape(value)?);
        Ok(())
    };
    if let Some(msgctxt) = entry.msgctxt() {
        keyword("msgctxt", msgctxt)?;
    }
    match entry {
        Entry::Direct(entry) => {
            keyword("msgid", &entry.msgid)?;
            keyword("msgstr", &entry.msgstr)?;
        }
        Entry::Countable(entry) => {
            keyword("msgid", &entry.msgid)?;
            keyword("msgid_plural", &entry.msgid_plural)?;
            // A plural entry needs at least one form to be read back.
            if entry.msgstr.is_empty() {
                keyword("msgstr[0]", "")?;
            }
            for (idx, msgstr) in entry.msgstr.iter().enumerate() {
                keyword(&format!("msgstr[{idx}]"), msgstr)?;
            }
        }
    }
    Ok(block)
}

/// Comments are written in the conventional Gettext order.
fn push_comments(block: &mut String, comments: &Comments, obsolete: bool) {
    let previous_prefix = if obsolete { "#~| " } else { "#| " };
    for previous in &comments.previous_string_comments {
        let _ = writeln!(block, "{previous_prefix}{previous}");
    }
    for comment in &comments.translator_comments {
        push_translator_comment(block, comment);
    }
    push_references(block, &comments.source_reference_comments);
    push_flags(block, &comments.flags_comments);
}

fn push_translator_comment(block: &mut String, comment: &str) {
    match comment.chars().next() {
        None => block.push_str("#\n"),
        // A marker such as `.` in `#.` goes right after the `#`.
        Some(ch) if ch.is_ascii_punctuation() && !matches!(ch, ',' | ':' | '|' | '~') => {
            let _ = writeln!(block, "#{comment}");
        }
        Some(_) => {
            let _ = writeln!(block, "# {comment}");
        }
    }
}

fn push_references(block: &mut String, references: &[String]) {
    if references.is_empty() {
        return;
    }
    let options = textwrap::Options::new(REFERENCE_WIDTH)
        .break_words(false)
        .word_splitter(textwrap::WordSplitter::NoHyphenation);
    for line in textwrap::wrap(&references.join(" "), options) {
        let _ = writeln!(block, "#: {line}");
    }
}

fn push_flags(block: &mut String, flags: &[String]) {
    if !flags.is_empty() {
        let _ = writeln!(block, "#, {}", flags.join(", "));
    }
}
