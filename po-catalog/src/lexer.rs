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

//! Classify the physical lines of a PO file.
//!
//! Each line is looked at in isolation: the lexer decides what kind of
//! line it is and decodes any quoted string on it. Grouping lines into
//! entries is left to the [parser](crate::parser).

use crate::error::LexError;

/// The keyword starting a keyword line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keyword {
    Msgctxt,
    Msgid,
    MsgidPlural,
    /// `msgstr` or `msgstr[N]`.
    Msgstr(Option<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `#`, `#.` and any unknown `#X` comment.
    TranslatorComment(String),
    /// `#:` comment with the raw space separated references.
    SourceRefComment(String),
    /// `#,` comment with the raw comma separated flags.
    FlagsComment(String),
    /// `#|` comment.
    PreviousStringComment(String),
    KeywordString { keyword: Keyword, value: String },
    /// A bare quoted string, continuing the preceding string.
    Continuation(String),
}

/// A classified physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// The line was prefixed by `#~`.
    pub obsolete: bool,
    pub kind: LineKind,
}

/// Lazily classify the lines of `text`.
///
/// # Examples
///
/// ```
/// use po_catalog::lexer::{Keyword, Lexer, LineKind};
///
/// let kinds = Lexer::new("#: foo.c:10\nmsgid \"Hello\"\n")
///     .map(|line| line.map(|line| line.kind))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(
///     kinds,
///     vec![
///         LineKind::SourceRefComment(String::from("foo.c:10")),
///         LineKind::KeywordString {
///             keyword: Keyword::Msgid,
///             value: String::from("Hello"),
///         },
///     ]
/// );
/// ```
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Line, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, text) = self.lines.next()?;
        Some(classify(idx + 1, text))
    }
}

/// Classify a single physical line.
pub fn classify(number: usize, text: &str) -> Result<Line, LexError> {
    // A byte order mark can only appear at the very start of the file.
    let text = if number == 1 {
        text.trim_start_matches('\u{feff}')
    } else {
        text
    };
    let text = text.trim_start().trim_end_matches('\r');

    if let Some(rest) = text.strip_prefix("#~") {
        let rest = rest.trim_start();
        let kind = match rest.strip_prefix('|') {
            Some(previous) => LineKind::PreviousStringComment(strip_one_space(previous)),
            None => classify_body(number, rest)?,
        };
        return Ok(Line {
            number,
            obsolete: true,
            kind,
        });
    }

    Ok(Line {
        number,
        obsolete: false,
        kind: classify_body(number, text)?,
    })
}

fn classify_body(number: usize, text: &str) -> Result<LineKind, LexError> {
    if text.trim().is_empty() {
        return Ok(LineKind::Blank);
    }

    if let Some(rest) = text.strip_prefix('#') {
        let kind = match rest.chars().next() {
            Some(',') => LineKind::FlagsComment(rest[1..].trim().to_owned()),
            Some(':') => LineKind::SourceRefComment(rest[1..].trim().to_owned()),
            Some('|') => LineKind::PreviousStringComment(strip_one_space(&rest[1..])),
            Some(' ' | '\t') => LineKind::TranslatorComment(rest[1..].to_owned()),
            // Keep the marker of `#.` and unknown extensions.
            _ => LineKind::TranslatorComment(rest.to_owned()),
        };
        return Ok(kind);
    }

    if text.starts_with('"') {
        return Ok(LineKind::Continuation(decode_string(number, text)?));
    }

    let token_end = text
        .find(|c: char| c.is_whitespace() || c == '"')
        .unwrap_or(text.len());
    let keyword =
        parse_keyword(&text[..token_end]).ok_or(LexError::UnrecognizedLine { line: number })?;
    let rest = text[token_end..].trim_start();
    if !rest.starts_with('"') {
        return Err(LexError::UnrecognizedLine { line: number });
    }
    Ok(LineKind::KeywordString {
        keyword,
        value: decode_string(number, rest)?,
    })
}

fn strip_one_space(text: &str) -> String {
    text.strip_prefix(' ').unwrap_or(text).to_owned()
}

fn parse_keyword(token: &str) -> Option<Keyword> {
    match token {
        "msgctxt" => Some(Keyword::Msgctxt),
        "msgid" => Some(Keyword::Msgid),
        "msgid_plural" => Some(Keyword::MsgidPlural),
        "msgstr" => Some(Keyword::Msgstr(None)),
        _ => {
            let digits = token.strip_prefix("msgstr[")?.strip_suffix(']')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok().map(|index| Keyword::Msgstr(Some(index)))
        }
    }
}

/// Decode a quoted string starting at the first character of `text`.
///
/// Only whitespace may follow the closing quote.
fn decode_string(number: usize, text: &str) -> Result<String, LexError> {
    let mut chars = text.strip_prefix('"').unwrap_or(text).chars();
    let mut value = String::with_capacity(text.len());
    loop {
        match chars.next() {
            None => return Err(LexError::UnterminatedString { line: number }),
            Some('"') => break,
            Some('\\') => {
                let decoded = match chars.next() {
                    None => return Err(LexError::UnterminatedString { line: number }),
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some('a') => '\u{07}',
                    Some('b') => '\u{08}',
                    Some('f') => '\u{0c}',
                    Some('v') => '\u{0b}',
                    Some(escape) => {
                        return Err(LexError::MalformedEscape {
                            line: number,
                            escape,
                        })
                    }
                };
                value.push(decoded);
            }
            Some(c) => value.push(c),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(LexError::UnrecognizedLine { line: number });
    }
    Ok(value)
}
