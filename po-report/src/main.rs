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

//! Translation progress of PO catalogs, as an HTML table or as the
//! difference between two directories of catalogs.

mod stats;

use anyhow::Context as _;
use clap::Parser;
use po_catalog::settings::init_tracing;
use po_catalog::{parse, FileKind};
use stats::MessageStats;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");

#[derive(Debug, Parser)]
#[command(about = "Summarize how far PO catalogs are translated")]
enum Args {
    /// Write an HTML table with one row per catalog.
    Report {
        #[arg(id = "report.html")]
        output: PathBuf,
        #[arg(id = "language.po")]
        catalogs: Vec<PathBuf>,
    },
    /// Print the languages whose counts differ between two directories of catalogs.
    Diff { old: PathBuf, new: PathBuf },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    match Args::parse() {
        Args::Report { output, catalogs } => report(&output, &catalogs),
        Args::Diff { old, new } => diff(&old, &new),
    }
}

/// Writes the HTML report for `translation_files` to `report_file`.
fn report(report_file: &Path, translation_files: &[PathBuf]) -> anyhow::Result<()> {
    let stats = translation_files
        .iter()
        .map(|path| read_stats(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    fs::write(report_file, render_report(stats)?)
        .with_context(|| format!("Could not write report to {}", report_file.display()))
}

/// Renders the stats as HTML, most translated language first.
fn render_report(mut stats: Vec<MessageStats>) -> anyhow::Result<String> {
    stats.sort_by(|a, b| b.translated_count.cmp(&a.translated_count));
    let languages = stats.iter().map(MessageStats::to_context).collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("languages", &languages);
    Ok(Tera::one_off(REPORT_TEMPLATE, &context, true)?)
}

fn read_stats(path: &Path) -> anyhow::Result<MessageStats> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let document =
        parse(&text, FileKind::Po).with_context(|| format!("Could not parse {}", path.display()))?;
    tracing::debug!("Read {} entries from {}", document.entries.len(), path.display());
    Ok(MessageStats::for_document(&document))
}

/// Stats of every `.po` file in `directory`, by language.
fn stats_by_language(directory: &Path) -> anyhow::Result<BTreeMap<String, MessageStats>> {
    po_files(directory)?
        .iter()
        .map(|path| {
            let stats = read_stats(path)?;
            Ok((stats.language.clone(), stats))
        })
        .collect()
}

/// Prints how the translations in `new_directory` differ from `old_directory`.
#[allow(clippy::print_stdout)]
fn diff(old_directory: &Path, new_directory: &Path) -> anyhow::Result<()> {
    let lines = diff_lines(
        &stats_by_language(old_directory)?,
        &stats_by_language(new_directory)?,
    );
    if !lines.is_empty() {
        println!("Counts are \"translated (fuzzy, fuzzy untranslated) / total\"");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// One line per language which was added, removed or changed, in
/// language order.
fn diff_lines(
    old: &BTreeMap<String, MessageStats>,
    new: &BTreeMap<String, MessageStats>,
) -> Vec<String> {
    let languages = old.keys().chain(new.keys()).collect::<BTreeSet<_>>();
    languages
        .into_iter()
        .filter_map(|language| match (old.get(language), new.get(language)) {
            (Some(old), None) => Some(format!("Removed {old}")),
            (None, Some(new)) => Some(format!("Added {new}")),
            (Some(old), Some(new)) if old != new => Some(format!("Changed {old} -> {new}")),
            _ => None,
        })
        .collect()
}

/// The `.po` files directly inside `directory`, sorted by name.
fn po_files(directory: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Could not read directory {}", directory.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "po") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
