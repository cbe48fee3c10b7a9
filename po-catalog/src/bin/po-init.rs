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

//! Create a new translation from a POT file, like `msginit`.

use anyhow::{bail, Context as _};
use clap::Parser;
use po_catalog::settings::{init_tracing, report_diagnostics, Settings};
use po_catalog::{generate, parse, serialize, BuiltinLanguages, FileKind, Identity};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Create a new PO file from a template")]
struct Args {
    #[arg(id = "template.pot")]
    template: PathBuf,
    /// Language code of the new translation, such as `de` or `pt_BR`.
    language: String,
    #[arg(id = "output.po")]
    output: PathBuf,
    /// TOML file with package metadata, translator and overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// The translator, as `Name <email>`.
    #[arg(long)]
    translator: Option<Identity>,
    /// Replace an existing output file.
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists, use --force to replace it",
            args.output.display()
        );
    }

    let mut settings = Settings::load_optional(args.config.as_deref())?;
    if let Some(translator) = args.translator {
        settings.translator = Some(translator);
    }

    let text = std::fs::read_to_string(&args.template)
        .with_context(|| format!("Could not read {}", args.template.display()))?;
    let template = parse(&text, FileKind::Pot)
        .with_context(|| format!("Could not parse {}", args.template.display()))?;

    let languages = BuiltinLanguages;
    let context = settings.context(&languages);
    let (document, diagnostics) =
        generate(&template, &args.language, &context, &settings.overrides);
    report_diagnostics(&args.output, &diagnostics);

    let output = serialize(&document)
        .with_context(|| format!("Could not serialize {}", args.output.display()))?;
    std::fs::write(&args.output, output)
        .with_context(|| format!("Could not write catalog to {}", args.output.display()))?;

    Ok(())
}
