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

use po_catalog::Document;
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};
use tera::Value;

/// Counts of translation message statuses.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageStats {
    pub language: String,
    pub pot_creation_date: String,
    pub non_translated_count: u32,
    pub translated_count: u32,
    pub fuzzy_non_translated_count: u32,
    pub fuzzy_translated_count: u32,
}

fn percent(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * f64::from(count) / f64::from(total)
}

impl MessageStats {
    /// Returns the total number of messages.
    pub fn total(&self) -> u32 {
        self.non_translated_count
            + self.translated_count
            + self.fuzzy_non_translated_count
            + self.fuzzy_translated_count
    }

    /// Converts the stats to a map of numbers to be used in context for a Tera template.
    pub fn to_context(&self) -> BTreeMap<String, Value> {
        let total = self.total();
        let mut context: BTreeMap<String, Value> = BTreeMap::new();
        context.insert("language".to_string(), self.language.as_str().into());
        context.insert(
            "pot_creation_date".to_string(),
            self.pot_creation_date.as_str().into(),
        );
        for (name, count) in [
            ("non_translated", self.non_translated_count),
            ("translated", self.translated_count),
            ("fuzzy_non_translated", self.fuzzy_non_translated_count),
            ("fuzzy_translated", self.fuzzy_translated_count),
        ] {
            context.insert(format!("{name}_count"), count.into());
            context.insert(format!("{name}_percent"), percent(count, total).into());
        }
        context.insert("total".to_string(), total.into());
        context
    }

    /// Returns counts of message statuses in the given document.
    ///
    /// Obsolete entries are not counted.
    pub fn for_document(document: &Document) -> Self {
        let mut stats = Self {
            language: document.header.get("Language").unwrap_or_default().to_owned(),
            pot_creation_date: document
                .header
                .get("POT-Creation-Date")
                .unwrap_or_default()
                .to_owned(),
            ..Self::default()
        };
        for entry in document.entries.iter().filter(|entry| !entry.is_obsolete()) {
            match (entry.is_translated(), entry.is_fuzzy()) {
                (true, true) => stats.fuzzy_translated_count += 1,
                (true, false) => stats.translated_count += 1,
                (false, true) => stats.fuzzy_non_translated_count += 1,
                (false, false) => stats.non_translated_count += 1,
            }
        }
        stats
    }
}

impl Display for MessageStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {}) / {}, creation date {}",
            self.language,
            self.translated_count,
            self.fuzzy_translated_count,
            self.fuzzy_non_translated_count,
            self.total(),
            self.pot_creation_date,
        )
    }
}
