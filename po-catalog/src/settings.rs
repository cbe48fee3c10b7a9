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

//! Shared setup for the command line tools.

use crate::context::{Context, Identity, LanguageTable, PackageMetadata};
use crate::normalize::{Diagnostic, Overrides};
use anyhow::Context as _;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Contents of a `--config` file.
///
/// ```toml
/// [package]
/// name = "foo"
/// version = "1.0"
/// bug-report-url = "https://example.com/bugs"
///
/// [translator]
/// name = "Jane Doe"
/// email = "jane@example.com"
///
/// [overrides]
/// "Language-Team" = "German <de@li.org>"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub package: Option<PackageMetadata>,
    pub translator: Option<Identity>,
    #[serde(default)]
    pub overrides: Overrides,
}

impl Settings {
    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::parse_str(&content)
            .with_context(|| format!("Could not parse config file {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read settings from `path` if given, otherwise use the defaults.
    pub fn load_optional(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Build a normalization context from these settings.
    pub fn context<'a>(&self, languages: &'a dyn LanguageTable) -> Context<'a> {
        let mut context = Context::new(languages);
        context.package = self.package.clone();
        context.identity = self.translator.clone();
        context
    }
}

/// Install a `fmt` subscriber which logs warnings unless `RUST_LOG`
/// says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Log every diagnostic as a warning.
pub fn report_diagnostics(path: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        tracing::warn!("{}: {diagnostic}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BuiltinLanguages;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_settings() {
        let settings = Settings::parse_str(
            r#"
            [package]
            name = "foo"
            version = "1.0"
            bug-report-url = "https://example.com/bugs"

            [translator]
            name = "Jane Doe"
            email = "jane@example.com"

            [overrides]
            "Language-Team" = "German <de@li.org>"
            "#,
        )
        .unwrap();
        assert_eq!(
            settings,
            Settings {
                package: Some(PackageMetadata {
                    name: String::from("foo"),
                    version: String::from("1.0"),
                    bug_report_url: Some(String::from("https://example.com/bugs")),
                }),
                translator: Some(Identity {
                    name: String::from("Jane Doe"),
                    email: String::from("jane@example.com"),
                }),
                overrides: Overrides::from([(
                    String::from("Language-Team"),
                    String::from("German <de@li.org>")
                )]),
            }
        );
    }

    #[test]
    fn test_parse_empty_settings() {
        assert_eq!(Settings::parse_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_parse_unknown_section() {
        assert!(Settings::parse_str("[bogus]\nx = 1\n").is_err());
    }

    #[test]
    fn test_load_optional_without_path() {
        assert_eq!(Settings::load_optional(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_context_from_settings() {
        let settings = Settings::parse_str(
            r#"
            [translator]
            name = "Jane Doe"
            email = "jane@example.com"
            "#,
        )
        .unwrap();
        let languages = BuiltinLanguages;
        let context = settings.context(&languages);
        assert_eq!(context.package, None);
        assert_eq!(
            context.identity.map(|identity| identity.to_string()),
            Some(String::from("Jane Doe <jane@example.com>"))
        );
    }
}
