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

//! Values from outside the catalog which feed header normalization.
//!
//! Nothing in here looks at the environment on its own: the caller
//! decides where package metadata and the translator identity come from
//! and passes them in through a [`Context`].

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Package name, version and bug tracker, usually read from a project
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub bug_report_url: Option<String>,
}

/// The translator, written as `Name <email>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl FromStr for Identity {
    type Err = String;

    /// Parse `Name <email>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('<')
            .ok_or_else(|| format!("expected `Name <email>`, got {s:?}"))?;
        let email = rest
            .trim_end()
            .strip_suffix('>')
            .ok_or_else(|| format!("missing `>` in {s:?}"))?;
        Ok(Identity {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
        })
    }
}

/// Language code validation and plural-forms lookup.
pub trait LanguageTable {
    fn is_valid_language_code(&self, code: &str) -> bool;

    /// The `Plural-Forms` expression for a base language code such as
    /// `de` or `pt`.
    fn plural_forms(&self, code: &str) -> Option<String>;
}

/// Plural forms for common languages, from the GNU Gettext manual.
const PLURAL_FORMS: &[(&str, &str)] = &[
    ("ja", "nplurals=1; plural=0;"),
    ("ko", "nplurals=1; plural=0;"),
    ("vi", "nplurals=1; plural=0;"),
    ("zh", "nplurals=1; plural=0;"),
    ("th", "nplurals=1; plural=0;"),
    ("bg", "nplurals=2; plural=(n != 1);"),
    ("da", "nplurals=2; plural=(n != 1);"),
    ("de", "nplurals=2; plural=(n != 1);"),
    ("el", "nplurals=2; plural=(n != 1);"),
    ("en", "nplurals=2; plural=(n != 1);"),
    ("eo", "nplurals=2; plural=(n != 1);"),
    ("es", "nplurals=2; plural=(n != 1);"),
    ("et", "nplurals=2; plural=(n != 1);"),
    ("fi", "nplurals=2; plural=(n != 1);"),
    ("fo", "nplurals=2; plural=(n != 1);"),
    ("he", "nplurals=2; plural=(n != 1);"),
    ("hi", "nplurals=2; plural=(n != 1);"),
    ("hu", "nplurals=2; plural=(n != 1);"),
    ("it", "nplurals=2; plural=(n != 1);"),
    ("nb", "nplurals=2; plural=(n != 1);"),
    ("nl", "nplurals=2; plural=(n != 1);"),
    ("nn", "nplurals=2; plural=(n != 1);"),
    ("no", "nplurals=2; plural=(n != 1);"),
    ("pt", "nplurals=2; plural=(n != 1);"),
    ("sv", "nplurals=2; plural=(n != 1);"),
    ("tr", "nplurals=2; plural=(n != 1);"),
    ("fa", "nplurals=2; plural=(n > 1);"),
    ("fr", "nplurals=2; plural=(n > 1);"),
    (
        "lv",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2);",
    ),
    ("ga", "nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;"),
    (
        "ro",
        "nplurals=3; plural=n==1 ? 0 : (n==0 || (n%100 > 0 && n%100 < 20)) ? 1 : 2;",
    ),
    (
        "lt",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "be",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "hr",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "ru",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "sr",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "uk",
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    ("cs", "nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;"),
    ("sk", "nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;"),
    (
        "pl",
        "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    ),
    (
        "sl",
        "nplurals=4; plural=(n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3);",
    ),
    (
        "ar",
        "nplurals=6; plural=(n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5);",
    ),
];

/// The built-in [`LanguageTable`].
///
/// A code is valid if it looks like `ll`, `lll`, optionally followed by
/// a territory (`_CC`, `-CC` or `_NNN`), a script (`_Ssss`) and a
/// `@variant`.
#[derive(Debug, Default, Copy, Clone)]
pub struct BuiltinLanguages;

impl LanguageTable for BuiltinLanguages {
    fn is_valid_language_code(&self, code: &str) -> bool {
        static RE: OnceLock<Regex> = OnceLock::new();

        let re = RE.get_or_init(|| {
            Regex::new(r"^[a-z]{2,3}(?:[_-](?:[A-Z]{2}|[0-9]{3}|[A-Z][a-z]{3}))?(?:@[A-Za-z0-9]+)?$")
                .unwrap()
        });
        re.is_match(code)
    }

    fn plural_forms(&self, code: &str) -> Option<String> {
        PLURAL_FORMS
            .iter()
            .find(|(language, _)| *language == code)
            .map(|(_, expr)| String::from(*expr))
    }
}

/// The primary language subtag: `pt` for `pt_BR`, `sr` for `sr@latin`.
pub fn base_language(code: &str) -> &str {
    code.split(['_', '-', '@', '.'])
        .next()
        .unwrap_or(code)
}

/// The current local time, formatted the way Gettext writes dates.
pub fn current_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M%z").to_string()
}

/// Everything header normalization needs from the outside world.
pub struct Context<'a> {
    pub package: Option<PackageMetadata>,
    pub timestamp: String,
    pub identity: Option<Identity>,
    pub languages: &'a dyn LanguageTable,
}

impl<'a> Context<'a> {
    /// A context with only the current time and the given language
    /// table.
    pub fn new(languages: &'a dyn LanguageTable) -> Self {
        Self {
            package: None,
            timestamp: current_timestamp(),
            identity: None,
            languages,
        }
    }

    pub fn with_package(mut self, package: PackageMetadata) -> Self {
        self.package = Some(package);
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}
