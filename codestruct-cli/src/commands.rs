//! Subcommand handlers
//!
//! Each handler returns the exit code for a run that completed; `Err` means the command
//! could not run at all.

use crate::files;
use anyhow::{Context, Result};
use clap::ArgMatches;
use codestruct_config::Loader;
use codestruct_parser::codestruct::formatting::{IndentStyle, LineRange};
use codestruct_parser::codestruct::hashing::{stale_hash_ids, ChangeKind, MerkleTree};
use codestruct_parser::codestruct::linting::{DiagnosticCode, Linter};
use codestruct_parser::codestruct::loader::DocumentLoader;
use codestruct_parser::codestruct::minifying::tables::{
    Abbreviations, ATTRIBUTE_KEYS, KEYWORDS, TYPES, VALUES,
};
use codestruct_parser::codestruct::minifying::{legend as minify_legend, MinifyStats};
use codestruct_parser::codestruct::model::Document;
use codestruct_parser::{format as format_document, locate_change, minify as minify_document};
use serde_json::json;
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const FINDINGS: u8 = 1;
const FAILED: u8 = 2;

fn load(path: &Path) -> Result<DocumentLoader> {
    Ok(DocumentLoader::from_path(path)?)
}

fn parse(loader: &DocumentLoader, path: &Path) -> Result<Document> {
    loader
        .parse()
        .with_context(|| format!("cannot parse {}", path.display()))
}

fn input_paths(matches: &ArgMatches) -> Result<Vec<PathBuf>> {
    let given = matches.get_many::<PathBuf>("paths").into_iter().flatten();
    files::expand(given).context("cannot list input files")
}

pub fn lint(matches: &ArgMatches, loader: Loader) -> Result<ExitCode> {
    let settings = loader.load()?;
    let linter = Linter::new(&settings.lint)?;
    let select = matches
        .get_many::<String>("select")
        .map(|codes| {
            codes
                .map(|code| code.parse::<DiagnosticCode>())
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let mut reports = Vec::new();
    for path in input_paths(matches)? {
        let mut diagnostics = linter.lint_file(&path);
        if let Some(select) = &select {
            diagnostics.retain(|diagnostic| select.contains(&diagnostic.code));
        }
        reports.push((path, diagnostics));
    }
    let total: usize = reports.iter().map(|(_, diagnostics)| diagnostics.len()).sum();

    if matches.get_one::<String>("format").map(String::as_str) == Some("json") {
        let files: Vec<_> = reports
            .iter()
            .map(|(path, diagnostics)| {
                json!({ "file": path.display().to_string(), "diagnostics": diagnostics })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        for (path, diagnostics) in &reports {
            for diagnostic in diagnostics {
                println!("{}:{}", path.display(), diagnostic);
            }
        }
        if total > 0 {
            eprintln!("{} problem(s) in {} file(s)", total, reports.len());
        }
    }

    if total > 0 && !matches.get_flag("no-fail") {
        Ok(ExitCode::from(FINDINGS))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

pub fn codes() -> Result<ExitCode> {
    for code in DiagnosticCode::ALL {
        println!(
            "{}  {:<7}  {:<13}  {}",
            code,
            code.default_severity().to_string(),
            code.category(),
            code.description()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn format(matches: &ArgMatches, loader: Loader) -> Result<ExitCode> {
    let mut config = loader.load()?.format;
    if let Some(indent) = matches.get_one::<String>("indent") {
        config.indent = indent.parse::<IndentStyle>()?;
    }
    config.placeholder_docs |= matches.get_flag("placeholder-docs");
    config.fix_attribute_keys |= matches.get_flag("fix-attribute-keys");
    config.range = matches
        .get_one::<String>("lines")
        .map(|lines| lines.parse::<LineRange>())
        .transpose()?;

    let check = matches.get_flag("check");
    let write = matches.get_flag("write");
    let mut unformatted = Vec::new();
    for path in input_paths(matches)? {
        let source = load(&path)?;
        let output = format_document(&parse(&source, &path)?, &config);
        if check {
            if output != source.source() {
                print!("{}", unified_diff(&path, source.source(), &output));
                unformatted.push(path);
            }
        } else if write {
            if output != source.source() {
                fs::write(&path, &output)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                log::info!("formatted {}", path.display());
            }
        } else {
            print!("{}", output);
        }
    }

    for path in &unformatted {
        println!("would reformat {}", path.display());
    }
    if unformatted.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(FINDINGS))
    }
}

fn unified_diff(path: &Path, original: &str, formatted: &str) -> String {
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .context_radius(3)
        .header(
            &format!("a/{}", path.display()),
            &format!("b/{}", path.display()),
        )
        .to_string()
}

pub fn minify(matches: &ArgMatches, loader: Loader) -> Result<ExitCode> {
    let mut config = loader.load()?.minify;
    config.legend &= !matches.get_flag("no-legend");
    config.drop_docs &= !matches.get_flag("keep-docs");

    let path = required_path(matches, "path")?;
    let source = load(path)?;
    let mut output = minify_document(&parse(&source, path)?, &config);
    if !output.ends_with('\n') {
        output.push('\n');
    }

    match matches.get_one::<PathBuf>("output") {
        Some(target) => fs::write(target, &output)
            .with_context(|| format!("cannot write {}", target.display()))?,
        None => print!("{}", output),
    }

    if matches.get_flag("stats") {
        eprintln!("{}", describe(&MinifyStats::new(source.source(), &output)));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(stats: &MinifyStats) -> String {
    format!(
        "{} -> {} bytes ({:.1}% smaller)",
        stats.original_bytes,
        stats.minified_bytes,
        stats.reduction_percent()
    )
}

/// Minified size of each file, without writing anything
pub fn analyze(matches: &ArgMatches, loader: Loader) -> Result<ExitCode> {
    let config = loader.load()?.minify;
    let mut total = MinifyStats {
        original_bytes: 0,
        minified_bytes: 0,
    };
    let mut analyzed = 0;
    let mut failed = 0;

    for path in input_paths(matches)? {
        let minified = load(&path).and_then(|source| {
            let document = parse(&source, &path)?;
            Ok((source, minify_document(&document, &config)))
        });
        match minified {
            Ok((source, output)) => {
                let stats = MinifyStats::new(source.source(), &output);
                println!("{}: {}", path.display(), describe(&stats));
                total.original_bytes += stats.original_bytes;
                total.minified_bytes += stats.minified_bytes;
                analyzed += 1;
            }
            Err(err) => {
                eprintln!("{}: {:#}", path.display(), err);
                failed += 1;
            }
        }
    }

    if analyzed > 1 {
        println!("total ({} files): {}", analyzed, describe(&total));
    }
    if matches.get_flag("mappings") {
        for (title, table) in [
            ("Keywords", &*KEYWORDS),
            ("Attributes", &*ATTRIBUTE_KEYS),
            ("Types", &*TYPES),
            ("Values", &*VALUES),
        ] {
            print_mappings(title, table);
        }
    }

    if failed > 0 {
        Ok(ExitCode::from(FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_mappings(title: &str, table: &Abbreviations) {
    println!();
    println!("{}:", title);
    for (full, short) in table.pairs() {
        println!("  {} -> {}", full, short);
    }
}

pub fn legend() -> Result<ExitCode> {
    println!("{}", minify_legend());
    Ok(ExitCode::SUCCESS)
}

pub fn hash(matches: &ArgMatches) -> Result<ExitCode> {
    let path = required_path(matches, "path")?;
    let document = parse(&load(path)?, path)?;
    let tree = MerkleTree::build(&document);
    println!("{}", tree.root());

    if matches.get_flag("all") {
        let stale = stale_hash_ids(&document, &tree);
        for id in document.walk() {
            let entity = document.entity(id);
            let mut line = format!(
                "{} {}{}",
                tree.hash_of(id).short(),
                "  ".repeat(document.depth(id)),
                entity.label()
            );
            if stale.contains(&id) {
                line.push_str(&format!(
                    " (stale hash id {})",
                    entity.hash_id().unwrap_or_default()
                ));
            }
            println!("{}", line);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn diff(matches: &ArgMatches) -> Result<ExitCode> {
    let old_path = required_path(matches, "old")?;
    let new_path = required_path(matches, "new")?;
    let old = parse(&load(old_path)?, old_path)?;
    let new = parse(&load(new_path)?, new_path)?;

    match locate_change(&old, &MerkleTree::build(&old), &new, &MerkleTree::build(&new)) {
        None => println!("no changes"),
        Some(change) => {
            let labels = change.labels(&new);
            let location = if labels.is_empty() {
                "(document)".to_string()
            } else {
                labels.join(" > ")
            };
            let what = match change.kind {
                ChangeKind::Content => "content changed",
                ChangeKind::Children => "children added or removed",
            };
            println!("{}: {}", location, what);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn required_path<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .with_context(|| format!("missing <{}>", name))
}
