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

//! Normalize the header of a PO or POT file.
//!
//! This program parses a catalog, makes sure the header has every
//! field Gettext expects with up-to-date values, and writes the
//! catalog back. Messages are written unchanged, except that strings
//! are no longer split over several lines.
//!
//! Whether the input is a template is decided by its file name: `.pot`
//! files are templates, everything else is a translation.

use anyhow::Context as _;
use clap::Parser;
use po_catalog::settings::{init_tracing, report_diagnostics, Settings};
use po_catalog::{normalize, parse, serialize, BuiltinLanguages, FileKind, Identity};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Normalize the header of a PO or POT file")]
struct Args {
    #[arg(id = "input.po")]
    input: PathBuf,
    #[arg(id = "output.po")]
    output: PathBuf,
    /// TOML file with package metadata, translator and overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// The translator, as `Name <email>`.
    #[arg(long)]
    translator: Option<Identity>,
    /// Set a header field, as `Name=Value`. May be repeated.
    #[arg(long = "set", value_parser = parse_override)]
    overrides: Vec<(String, String)>,
    /// Write the normalized document as JSON instead of PO text.
    #[arg(long)]
    json: bool,
}

fn parse_override(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected `Name=Value`, got {arg:?}"))?;
    Ok((name.trim().to_owned(), value.to_owned()))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = Settings::load_optional(args.config.as_deref())?;
    if let Some(translator) = args.translator {
        settings.translator = Some(translator);
    }
    settings.overrides.extend(args.overrides);

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    let document = parse(&text, FileKind::from_path(&args.input))
        .with_context(|| format!("Could not parse {}", args.input.display()))?;

    let languages = BuiltinLanguages;
    let context = settings.context(&languages);
    let (document, diagnostics) = normalize(document, &context, &settings.overrides);
    report_diagnostics(&args.input, &diagnostics);

    let output = if args.json {
        serde_json::to_string_pretty(&document)?
    } else {
        serialize(&document)
            .with_context(|| format!("Could not serialize {}", args.input.display()))?
    };
    std::fs::write(&args.output, output)
        .with_context(|| format!("Could not write catalog to {}", args.output.display()))?;

    Ok(())
}
