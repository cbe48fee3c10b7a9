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

//! The header entry of a catalog, as an ordered table of fields.

use serde::Serialize;

/// Ordered `(name, value)` pairs from the header `msgstr`.
///
/// Names are not required to be unique: a freshly parsed table keeps
/// duplicates and [`normalize`](crate::normalize) collapses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a header `msgstr` into fields.
    ///
    /// Every line is split on the first `:` and both halves are
    /// trimmed. A line without `:` becomes a field with an empty value.
    ///
    /// # Examples
    ///
    /// ```
    /// use po_catalog::Metadata;
    ///
    /// let metadata = Metadata::from_msgstr("Language: de\nMIME-Version: 1.0\n");
    /// assert_eq!(metadata.get("Language"), Some("de"));
    /// assert_eq!(metadata.len(), 2);
    /// ```
    pub fn from_msgstr(msgstr: &str) -> Self {
        let fields = msgstr
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| match line.split_once(':') {
                Some((name, value)) => (name.trim().to_owned(), value.trim().to_owned()),
                None => (line.trim().to_owned(), String::new()),
            })
            .collect();
        Self { fields }
    }

    /// Join the fields back into a header `msgstr`.
    pub fn to_msgstr(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{name}: {value}\n"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields called `name`.
    pub fn count(&self, name: &str) -> usize {
        self.fields.iter().filter(|(field, _)| field == name).count()
    }

    /// Replace the value of the first field called `name`, or append
    /// the field if it is absent. Returns the old value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.fields.push((name.to_owned(), value));
                None
            }
        }
    }

    /// Append a field without looking for an existing one.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Drop every field called `name` except the first one. Returns the
    /// number of dropped fields.
    pub fn dedup(&mut self, name: &str) -> usize {
        let before = self.fields.len();
        let mut seen = false;
        self.fields.retain(|(field, _)| {
            if field != name {
                return true;
            }
            !std::mem::replace(&mut seen, true)
        });
        before - self.fields.len()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_msgstr() {
        let metadata = Metadata::from_msgstr(
            "Project-Id-Version: foo 1.0\n\
             Content-Type: text/plain; charset=UTF-8\n\
             \n\
             Plural-Forms: nplurals=2; plural=(n != 1);\n\
             Language:\n\
             Broken line",
        );
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![
                ("Project-Id-Version", "foo 1.0"),
                ("Content-Type", "text/plain; charset=UTF-8"),
                ("Plural-Forms", "nplurals=2; plural=(n != 1);"),
                ("Language", ""),
                ("Broken line", ""),
            ]
        );
    }

    #[test]
    fn test_from_msgstr_keeps_duplicates() {
        let metadata = Metadata::from_msgstr("Language: de\nLanguage: fr\n");
        assert_eq!(metadata.count("Language"), 2);
        assert_eq!(metadata.get("Language"), Some("de"));
    }

    #[test]
    fn test_to_msgstr() {
        let metadata = Metadata::from_iter([("Language", "de"), ("Language-Team", "")]);
        assert_eq!(metadata.to_msgstr(), "Language: de\nLanguage-Team: \n");
        assert_eq!(Metadata::from_msgstr(&metadata.to_msgstr()), metadata);
    }

    #[test]
    fn test_set_preserves_position() {
        let mut metadata = Metadata::from_iter([("A", "1"), ("B", "2"), ("C", "3")]);
        assert_eq!(metadata.set("B", "two"), Some(String::from("2")));
        assert_eq!(metadata.set("D", "4"), None);
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![("A", "1"), ("B", "two"), ("C", "3"), ("D", "4")]
        );
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut metadata =
            Metadata::from_iter([("A", "1"), ("B", "2"), ("A", "3"), ("C", "4"), ("A", "5")]);
        assert_eq!(metadata.dedup("A"), 2);
        assert_eq!(metadata.dedup("B"), 0);
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![("A", "1"), ("B", "2"), ("C", "4")]
        );
    }
}
