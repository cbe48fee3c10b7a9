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

//! Normalize the header entry of a PO or POT file.
//!
//! This file contains main logic used by the binary `po-normalize`.
//!
//! Normalization never fails. Anything unusual about the header is
//! reported as a [`Diagnostic`] next to the repaired result.

use crate::context::{base_language, Context};
use crate::document::{Document, FileKind};
use crate::metadata::Metadata;
use std::collections::BTreeMap;
use std::fmt;

pub const PROJECT_ID_VERSION: &str = "Project-Id-Version";
pub const REPORT_MSGID_BUGS_TO: &str = "Report-Msgid-Bugs-To";
pub const POT_CREATION_DATE: &str = "POT-Creation-Date";
pub const PO_REVISION_DATE: &str = "PO-Revision-Date";
pub const LAST_TRANSLATOR: &str = "Last-Translator";
pub const LANGUAGE_TEAM: &str = "Language-Team";
pub const MIME_VERSION: &str = "MIME-Version";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
pub const LANGUAGE: &str = "Language";
pub const PLURAL_FORMS: &str = "Plural-Forms";

/// Fields every catalog must have, in their conventional order.
const REQUIRED_FIELDS: [&str; 9] = [
    PROJECT_ID_VERSION,
    REPORT_MSGID_BUGS_TO,
    POT_CREATION_DATE,
    PO_REVISION_DATE,
    LAST_TRANSLATOR,
    LANGUAGE_TEAM,
    MIME_VERSION,
    CONTENT_TYPE,
    CONTENT_TRANSFER_ENCODING,
];

/// Fields only translations must have.
const PO_ONLY_FIELDS: [&str; 2] = [LANGUAGE, PLURAL_FORMS];

/// Caller-supplied field values. They win over anything computed.
pub type Overrides = BTreeMap<String, String>;

/// The required header fields for `file_kind`.
pub fn required_fields(file_kind: FileKind) -> impl Iterator<Item = &'static str> {
    let po_only: &'static [&'static str] = match file_kind {
        FileKind::Po => &PO_ONLY_FIELDS,
        FileKind::Pot => &[],
    };
    REQUIRED_FIELDS.into_iter().chain(po_only.iter().copied())
}

/// A context value needed to compute a field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextInput {
    PackageMetadata,
    BugReportUrl,
    LocalIdentity,
}

/// A non-fatal finding from normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The field was absent and an empty placeholder was inserted.
    MissingField { name: String },
    /// Later occurrences of the field were dropped.
    DuplicateField { name: String, dropped: usize },
    /// The field had an unexpected value and was overwritten.
    UpdatedField {
        name: String,
        old: String,
        new: String,
    },
    /// The field was left alone since its input is not available.
    UnresolvedContext { name: String, input: ContextInput },
    /// The `Language` field is empty, so `Plural-Forms` was not resolved.
    MissingLanguage,
    InvalidLanguageCode { code: String },
    /// No plural forms are known for the language.
    UnsupportedLanguage { language: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingField { name } => write!(f, "added missing field {name}"),
            Diagnostic::DuplicateField { name, dropped } => {
                write!(f, "dropped {dropped} duplicate {name} field(s)")
            }
            Diagnostic::UpdatedField { name, old, new } => {
                write!(f, "updated {name} from {old:?} to {new:?}")
            }
            Diagnostic::UnresolvedContext { name, input } => {
                write!(f, "cannot update {name}: {input:?} is not available")
            }
            Diagnostic::MissingLanguage => {
                write!(f, "{LANGUAGE} is empty, not resolving {PLURAL_FORMS}")
            }
            Diagnostic::InvalidLanguageCode { code } => {
                write!(f, "{code:?} is not a valid language code")
            }
            Diagnostic::UnsupportedLanguage { language } => {
                write!(f, "no plural forms known for {language:?}")
            }
        }
    }
}

enum Expected {
    Value(String),
    /// Keep whatever is there.
    Keep,
    Unresolved(ContextInput),
}

fn expected_value(name: &str, context: &Context, overrides: &Overrides) -> Expected {
    if let Some(value) = overrides.get(name) {
        return Expected::Value(value.clone());
    }
    match name {
        PROJECT_ID_VERSION => match &context.package {
            Some(package) => Expected::Value(format!("{} {}", package.name, package.version)),
            None => Expected::Unresolved(ContextInput::PackageMetadata),
        },
        REPORT_MSGID_BUGS_TO => match &context.package {
            Some(package) => match &package.bug_report_url {
                Some(url) => Expected::Value(url.clone()),
                None => Expected::Unresolved(ContextInput::BugReportUrl),
            },
            None => Expected::Unresolved(ContextInput::PackageMetadata),
        },
        PO_REVISION_DATE => Expected::Value(context.timestamp.clone()),
        LAST_TRANSLATOR => match &context.identity {
            Some(identity) => Expected::Value(identity.to_string()),
            None => Expected::Unresolved(ContextInput::LocalIdentity),
        },
        LANGUAGE_TEAM => Expected::Value(String::new()),
        MIME_VERSION => Expected::Value(String::from("1.0")),
        CONTENT_TYPE => Expected::Value(String::from("text/plain; charset=UTF-8")),
        CONTENT_TRANSFER_ENCODING => Expected::Value(String::from("8bit")),
        // The creation date belongs to whoever created the template.
        // Language and Plural-Forms are resolved in `normalize_language`.
        _ => Expected::Keep,
    }
}

fn update(metadata: &mut Metadata, name: &str, value: String, diagnostics: &mut Vec<Diagnostic>) {
    if metadata.get(name) == Some(value.as_str()) {
        return;
    }
    let old = metadata.set(name, value.clone()).unwrap_or_default();
    diagnostics.push(Diagnostic::UpdatedField {
        name: name.to_owned(),
        old,
        new: value,
    });
}

/// Normalize a metadata table in place.
///
/// Every required field is made present, then brought to its expected
/// value. Repeated fields keep only their first occurrence. For
/// translations, `Plural-Forms` is derived from the `Language` field.
pub fn normalize_metadata(
    metadata: &mut Metadata,
    file_kind: FileKind,
    context: &Context,
    overrides: &Overrides,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for name in required_fields(file_kind) {
        if !metadata.contains(name) {
            metadata.push(name, "");
            diagnostics.push(Diagnostic::MissingField {
                name: name.to_owned(),
            });
        }

        let dropped = metadata.dedup(name);
        if dropped > 0 {
            diagnostics.push(Diagnostic::DuplicateField {
                name: name.to_owned(),
                dropped,
            });
        }

        match expected_value(name, context, overrides) {
            Expected::Value(value) => update(metadata, name, value, &mut diagnostics),
            Expected::Keep => {}
            Expected::Unresolved(input) => diagnostics.push(Diagnostic::UnresolvedContext {
                name: name.to_owned(),
                input,
            }),
        }
    }

    let required = required_fields(file_kind).collect::<Vec<_>>();
    let mut others = Vec::<String>::new();
    for (name, _) in metadata.iter() {
        if !required.contains(&name) && !others.iter().any(|other| other == name) {
            others.push(name.to_owned());
        }
    }
    for name in others {
        let dropped = metadata.dedup(&name);
        if dropped > 0 {
            diagnostics.push(Diagnostic::DuplicateField { name, dropped });
        }
    }

    for (name, value) in overrides {
        if !required.contains(&name.as_str()) {
            update(metadata, name, value.clone(), &mut diagnostics);
        }
    }

    if file_kind == FileKind::Po {
        normalize_language(metadata, context, overrides, &mut diagnostics);
    }

    for diagnostic in &diagnostics {
        tracing::debug!("{diagnostic}");
    }
    diagnostics
}

fn normalize_language(
    metadata: &mut Metadata,
    context: &Context,
    overrides: &Overrides,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let language = metadata.get(LANGUAGE).unwrap_or_default().to_owned();
    if language.is_empty() {
        diagnostics.push(Diagnostic::MissingLanguage);
        return;
    }

    // Validity and plural forms are independent: an odd code may
    // still have a known base language.
    if !context.languages.is_valid_language_code(&language) {
        diagnostics.push(Diagnostic::InvalidLanguageCode {
            code: language.clone(),
        });
    }

    if overrides.contains_key(PLURAL_FORMS) {
        return;
    }
    match context.languages.plural_forms(base_language(&language)) {
        Some(plural_forms) => update(metadata, PLURAL_FORMS, plural_forms, diagnostics),
        None => diagnostics.push(Diagnostic::UnsupportedLanguage { language }),
    }
}

/// Normalize the header of `document`.
pub fn normalize(
    mut document: Document,
    context: &Context,
    overrides: &Overrides,
) -> (Document, Vec<Diagnostic>) {
    let diagnostics =
        normalize_metadata(&mut document.header, document.file_kind, context, overrides);
    (document, diagnostics)
}

/// Something with a header to normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeTarget {
    Document(Document),
    Metadata {
        metadata: Metadata,
        file_kind: FileKind,
    },
}

/// Normalize either a whole document or a bare metadata table.
pub fn normalize_target(
    target: NormalizeTarget,
    context: &Context,
    overrides: &Overrides,
) -> (NormalizeTarget, Vec<Diagnostic>) {
    match target {
        NormalizeTarget::Document(document) => {
            let (document, diagnostics) = normalize(document, context, overrides);
            (NormalizeTarget::Document(document), diagnostics)
        }
        NormalizeTarget::Metadata {
            mut metadata,
            file_kind,
        } => {
            let diagnostics = normalize_metadata(&mut metadata, file_kind, context, overrides);
            (
                NormalizeTarget::Metadata {
                    metadata,
                    file_kind,
                },
                diagnostics,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BuiltinLanguages, Identity, LanguageTable, PackageMetadata};
    use pretty_assertions::assert_eq;

    const NOW: &str = "2024-05-01 12:00+0200";

    fn full_context(languages: &dyn LanguageTable) -> Context<'_> {
        Context::new(languages)
            .with_timestamp(NOW)
            .with_package(PackageMetadata {
                name: String::from("foo"),
                version: String::from("1.2.3"),
                bug_report_url: Some(String::from("https://example.com/bugs")),
            })
            .with_identity(Identity {
                name: String::from("Jane Doe"),
                email: String::from("jane@example.com"),
            })
    }

    fn names(metadata: &Metadata) -> Vec<&str> {
        metadata.iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_pot_fields_present_and_unique() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([
            (MIME_VERSION, "1.0"),
            (MIME_VERSION, "2.0"),
            ("X-Generator", "hand"),
        ]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());

        for name in required_fields(FileKind::Pot) {
            assert_eq!(metadata.count(name), 1, "{name}");
        }
        assert!(!metadata.contains(LANGUAGE));
        assert!(!metadata.contains(PLURAL_FORMS));
        assert_eq!(metadata.get("X-Generator"), Some("hand"));
        assert!(diagnostics.contains(&Diagnostic::DuplicateField {
            name: String::from(MIME_VERSION),
            dropped: 1,
        }));
        assert!(diagnostics.contains(&Diagnostic::MissingField {
            name: String::from(PROJECT_ID_VERSION),
        }));
    }

    #[test]
    fn test_dedup_non_required_fields() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([
            ("X-Generator", "a"),
            (LANGUAGE, "de"),
            ("X-Generator", "b"),
            (LANGUAGE, "fr"),
        ]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());

        assert_eq!(metadata.count("X-Generator"), 1);
        assert_eq!(metadata.get("X-Generator"), Some("a"));
        assert_eq!(metadata.count(LANGUAGE), 1);
        assert_eq!(metadata.get(LANGUAGE), Some("de"));
        for name in ["X-Generator", LANGUAGE] {
            assert!(diagnostics.contains(&Diagnostic::DuplicateField {
                name: String::from(name),
                dropped: 1,
            }));
        }
    }

    #[test]
    fn test_expected_values() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([
            (POT_CREATION_DATE, "2020-01-01 00:00+0000"),
            (CONTENT_TYPE, "text/plain; charset=CHARSET"),
            (LANGUAGE_TEAM, "LANGUAGE <LL@li.org>"),
        ]);
        normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![
                (POT_CREATION_DATE, "2020-01-01 00:00+0000"),
                (CONTENT_TYPE, "text/plain; charset=UTF-8"),
                (LANGUAGE_TEAM, ""),
                (PROJECT_ID_VERSION, "foo 1.2.3"),
                (REPORT_MSGID_BUGS_TO, "https://example.com/bugs"),
                (PO_REVISION_DATE, NOW),
                (LAST_TRANSLATOR, "Jane Doe <jane@example.com>"),
                (MIME_VERSION, "1.0"),
                (CONTENT_TRANSFER_ENCODING, "8bit"),
            ]
        );
    }

    #[test]
    fn test_pot_creation_date_is_never_updated() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([(POT_CREATION_DATE, "2001-01-01 00:00+0000")]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());
        assert_eq!(metadata.get(POT_CREATION_DATE), Some("2001-01-01 00:00+0000"));
        assert!(!diagnostics.iter().any(|diagnostic| matches!(
            diagnostic,
            Diagnostic::UpdatedField { name, .. } if name == POT_CREATION_DATE
        )));
    }

    #[test]
    fn test_overrides_win() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let overrides = Overrides::from([
            (String::from(LANGUAGE_TEAM), String::from("German <de@li.org>")),
            (String::from(POT_CREATION_DATE), String::from("today")),
            (String::from("X-Generator"), String::from("po-catalog")),
        ]);
        let mut metadata = Metadata::new();
        normalize_metadata(&mut metadata, FileKind::Pot, &context, &overrides);
        assert_eq!(metadata.get(LANGUAGE_TEAM), Some("German <de@li.org>"));
        assert_eq!(metadata.get(POT_CREATION_DATE), Some("today"));
        assert_eq!(metadata.get("X-Generator"), Some("po-catalog"));
    }

    #[test]
    fn test_unresolved_context_is_skipped() {
        let languages = BuiltinLanguages;
        let context = Context::new(&languages).with_timestamp(NOW);
        let mut metadata = Metadata::from_iter([
            (PROJECT_ID_VERSION, "bar 0.1"),
            (LAST_TRANSLATOR, "Someone <s@example.com>"),
        ]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());
        assert_eq!(metadata.get(PROJECT_ID_VERSION), Some("bar 0.1"));
        assert_eq!(metadata.get(LAST_TRANSLATOR), Some("Someone <s@example.com>"));
        assert_eq!(metadata.get(REPORT_MSGID_BUGS_TO), Some(""));
        for (name, input) in [
            (PROJECT_ID_VERSION, ContextInput::PackageMetadata),
            (REPORT_MSGID_BUGS_TO, ContextInput::PackageMetadata),
            (LAST_TRANSLATOR, ContextInput::LocalIdentity),
        ] {
            assert!(diagnostics.contains(&Diagnostic::UnresolvedContext {
                name: String::from(name),
                input,
            }));
        }
    }

    #[test]
    fn test_missing_bug_report_url() {
        let languages = BuiltinLanguages;
        let mut context = full_context(&languages);
        if let Some(package) = context.package.as_mut() {
            package.bug_report_url = None;
        }
        let mut metadata = Metadata::new();
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Pot, &context, &Overrides::new());
        assert!(diagnostics.contains(&Diagnostic::UnresolvedContext {
            name: String::from(REPORT_MSGID_BUGS_TO),
            input: ContextInput::BugReportUrl,
        }));
    }

    #[test]
    fn test_po_empty_language_stops() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata =
            Metadata::from_iter([(PLURAL_FORMS, "nplurals=INTEGER; plural=EXPRESSION;")]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Po, &context, &Overrides::new());
        assert_eq!(metadata.get(LANGUAGE), Some(""));
        assert_eq!(
            metadata.get(PLURAL_FORMS),
            Some("nplurals=INTEGER; plural=EXPRESSION;")
        );
        assert_eq!(diagnostics.last(), Some(&Diagnostic::MissingLanguage));
        assert!(!diagnostics.iter().any(|diagnostic| matches!(
            diagnostic,
            Diagnostic::UnsupportedLanguage { .. } | Diagnostic::InvalidLanguageCode { .. }
        )));
    }

    #[test]
    fn test_po_plural_forms_from_language() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([(LANGUAGE, "pt_BR")]);
        normalize_metadata(&mut metadata, FileKind::Po, &context, &Overrides::new());
        assert_eq!(
            metadata.get(PLURAL_FORMS),
            Some("nplurals=2; plural=(n != 1);")
        );
    }

    #[test]
    fn test_po_invalid_language_still_resolves() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata = Metadata::from_iter([(LANGUAGE, "de_de")]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Po, &context, &Overrides::new());
        assert!(diagnostics.contains(&Diagnostic::InvalidLanguageCode {
            code: String::from("de_de"),
        }));
        assert_eq!(
            metadata.get(PLURAL_FORMS),
            Some("nplurals=2; plural=(n != 1);")
        );
    }

    #[test]
    fn test_po_unsupported_language() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let mut metadata =
            Metadata::from_iter([(LANGUAGE, "xx"), (PLURAL_FORMS, "nplurals=1; plural=0;")]);
        let diagnostics =
            normalize_metadata(&mut metadata, FileKind::Po, &context, &Overrides::new());
        assert_eq!(metadata.get(PLURAL_FORMS), Some("nplurals=1; plural=0;"));
        assert_eq!(
            diagnostics.last(),
            Some(&Diagnostic::UnsupportedLanguage {
                language: String::from("xx"),
            })
        );
    }

    #[test]
    fn test_plural_forms_override_skips_lookup() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let overrides = Overrides::from([
            (String::from(LANGUAGE), String::from("xx")),
            (String::from(PLURAL_FORMS), String::from("nplurals=1; plural=0;")),
        ]);
        let mut metadata = Metadata::new();
        let diagnostics = normalize_metadata(&mut metadata, FileKind::Po, &context, &overrides);
        assert_eq!(metadata.get(LANGUAGE), Some("xx"));
        assert_eq!(metadata.get(PLURAL_FORMS), Some("nplurals=1; plural=0;"));
        assert!(!diagnostics.iter().any(|diagnostic| matches!(
            diagnostic,
            Diagnostic::UnsupportedLanguage { .. }
        )));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let overrides = Overrides::from([(String::from(LANGUAGE), String::from("fr"))]);
        let mut document = Document::new(FileKind::Po);
        document.header = Metadata::from_iter([
            (PROJECT_ID_VERSION, "old"),
            (LANGUAGE, "de"),
            (LANGUAGE, "de"),
        ]);

        let (document, diagnostics) = normalize(document, &context, &overrides);
        assert!(!diagnostics.is_empty());
        let first = document.header.clone();

        let (document, diagnostics) = normalize(document, &context, &overrides);
        assert_eq!(diagnostics, Vec::new());
        assert_eq!(document.header, first);
        assert_eq!(
            names(&document.header),
            vec![
                PROJECT_ID_VERSION,
                LANGUAGE,
                REPORT_MSGID_BUGS_TO,
                POT_CREATION_DATE,
                PO_REVISION_DATE,
                LAST_TRANSLATOR,
                LANGUAGE_TEAM,
                MIME_VERSION,
                CONTENT_TYPE,
                CONTENT_TRANSFER_ENCODING,
                PLURAL_FORMS,
            ]
        );
    }

    #[test]
    fn test_normalize_target_dispatch() {
        let languages = BuiltinLanguages;
        let context = full_context(&languages);
        let (target, _) = normalize_target(
            NormalizeTarget::Metadata {
                metadata: Metadata::new(),
                file_kind: FileKind::Pot,
            },
            &context,
            &Overrides::new(),
        );
        let NormalizeTarget::Metadata { metadata, .. } = target else {
            panic!("Expected a metadata table");
        };
        assert_eq!(metadata.len(), REQUIRED_FIELDS.len());

        let (target, _) = normalize_target(
            NormalizeTarget::Document(Document::new(FileKind::Po)),
            &context,
            &Overrides::new(),
        );
        let NormalizeTarget::Document(document) = target else {
            panic!("Expected a document");
        };
        assert_eq!(document.header.len(), REQUIRED_FIELDS.len() + PO_ONLY_FIELDS.len());
    }

    #[test]
    fn test_diagnostic_display() {
        assert_eq!(
            Diagnostic::UpdatedField {
                name: String::from(MIME_VERSION),
                old: String::from("2.0"),
                new: String::from("1.0"),
            }
            .to_string(),
            "updated MIME-Version from \"2.0\" to \"1.0\""
        );
        assert_eq!(
            Diagnostic::MissingLanguage.to_string(),
            "Language is empty, not resolving Plural-Forms"
        );
    }
}
