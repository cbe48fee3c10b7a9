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

//! Read, normalize and write Gettext message catalogs.
//!
//! A PO or POT file is parsed into a [`Document`], which can have its
//! header repaired with [`normalize()`] or be turned into a fresh
//! translation with [`generate()`]. The document is written back with
//! [`serialize()`].
//!
//! # Examples
//!
//! ```
//! use po_catalog::{parse, serialize, FileKind, SourceKind};
//!
//! let text = "#: foo.c:10\nmsgid \"Hello\"\nmsgstr \"\"\n";
//! let document = parse(text, FileKind::Pot).unwrap();
//! assert_eq!(document.source_kind, SourceKind::C);
//! assert_eq!(document.direct_entries().count(), 1);
//! assert_eq!(serialize(&document).unwrap(), text);
//! ```

pub mod context;
pub mod document;
pub mod error;
pub mod generate;
pub mod lexer;
pub mod metadata;
pub mod normalize;
pub mod parser;
pub mod serializer;
pub mod settings;

pub use context::{BuiltinLanguages, Context, Identity, LanguageTable, PackageMetadata};
pub use document::{
    Comments, CountableEntry, DirectEntry, Document, Entry, FileKind, SourceKind,
};
pub use error::{LexError, ParseError, Result, SerializeError, StructuralError};
pub use generate::generate;
pub use metadata::Metadata;
pub use normalize::{normalize, normalize_target, Diagnostic, NormalizeTarget, Overrides};
pub use parser::parse;
pub use serializer::serialize;
