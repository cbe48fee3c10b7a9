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

//! Fatal errors raised while reading or writing a catalog.
//!
//! Line numbers are 1-based and refer to physical lines of the input.

use thiserror::Error;

/// A physical line could not be classified or decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unrecognized line")]
    UnrecognizedLine { line: usize },
    #[error("line {line}: malformed escape sequence `\\{escape}`")]
    MalformedEscape { line: usize, escape: char },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnrecognizedLine { line }
            | LexError::MalformedEscape { line, .. }
            | LexError::UnterminatedString { line } => *line,
        }
    }
}

/// The lines are well-formed, but they do not group into valid entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("line {line}: entry does not start with msgid")]
    MissingMsgid { line: usize },
    #[error("line {line}: entry mixes obsolete and active keyword lines")]
    InconsistentObsoleteMarking { line: usize },
    #[error("line {line}: msgstr[{index}] is declared twice")]
    DuplicateMsgstrIndex { line: usize, index: usize },
    #[error("line {line}: entry has no msgstr")]
    MissingMsgstr { line: usize },
    #[error("line {line}: msgstr form does not match the presence of msgid_plural")]
    MismatchedMsgstr { line: usize },
    #[error("line {line}: msgstr[{index}] is missing")]
    MsgstrIndexGap { line: usize, index: usize },
    #[error("line {line}: {keyword} appears twice in one entry")]
    RepeatedKeyword { line: usize, keyword: &'static str },
    /// Another entry already has the same context and `msgid`.
    #[error("line {line}: duplicate message definition")]
    DuplicateEntry { line: usize },
}

impl StructuralError {
    pub fn line(&self) -> usize {
        match self {
            StructuralError::MissingMsgid { line }
            | StructuralError::InconsistentObsoleteMarking { line }
            | StructuralError::DuplicateMsgstrIndex { line, .. }
            | StructuralError::MissingMsgstr { line }
            | StructuralError::MismatchedMsgstr { line }
            | StructuralError::MsgstrIndexGap { line, .. }
            | StructuralError::RepeatedKeyword { line, .. }
            | StructuralError::DuplicateEntry { line } => *line,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl ParseError {
    /// The line where parsing stopped.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(err) => err.line(),
            ParseError::Structural(err) => err.line(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// The string holds a character the PO escape grammar cannot express.
    #[error("cannot write {value:?}: it contains a NUL character")]
    UnrepresentableValue { value: String },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
