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

//! Create a fresh translation from a template.

use crate::context::Context;
use crate::document::{Document, FileKind};
use crate::normalize::{normalize, Diagnostic, Overrides, LANGUAGE, PLURAL_FORMS};
use regex::Regex;
use std::sync::OnceLock;

/// The number of plural forms declared by a `Plural-Forms` expression.
fn nplurals(plural_forms: &str) -> Option<usize> {
    static RE: OnceLock<Regex> = OnceLock::new();

    let re = RE.get_or_init(|| Regex::new(r"nplurals\s*=\s*(\d+)").unwrap());
    re.captures(plural_forms)?.get(1)?.as_str().parse().ok()
}

/// Generate a PO file for `language` from `template`.
///
/// Every translation is emptied while comments and obsolete markers are
/// kept. The header is normalized with `Language` set to `language`,
/// which also derives `Plural-Forms`. If no plural forms are known for
/// the language, `Plural-Forms` is left empty and the problem is
/// reported as a diagnostic.
///
/// Further `overrides` are applied in the same pass, so an overridden
/// `Plural-Forms` also decides the number of translations.
///
/// Countable entries get as many empty translations as `Plural-Forms`
/// declares, and never fewer than one.
pub fn generate(
    template: &Document,
    language: &str,
    context: &Context,
    overrides: &Overrides,
) -> (Document, Vec<Diagnostic>) {
    let mut document = template.clone();
    document.file_kind = FileKind::Po;

    let mut overrides = overrides.clone();
    overrides.insert(String::from(LANGUAGE), String::from(language));
    let (mut document, diagnostics) = normalize(document, context, &overrides);

    if diagnostics
        .iter()
        .any(|diagnostic| matches!(diagnostic, Diagnostic::UnsupportedLanguage { .. }))
    {
        document.header.set(PLURAL_FORMS, "");
    }

    let count = document
        .header
        .get(PLURAL_FORMS)
        .and_then(nplurals)
        .map(|count| count.max(1));
    tracing::debug!("Generating {language} catalog with {count:?} plural forms");
    for entry in &mut document.entries {
        entry.clear_translations(count);
    }

    (document, diagnostics)
}
