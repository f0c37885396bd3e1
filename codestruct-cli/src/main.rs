//! Command-line interface for CodeStruct
//!
//! Usage:
//!   codestruct lint `<paths>...` [--format text|json] [--select CODES] [--no-fail]
//!   codestruct format `<paths>...` [--indent 2|4|tab] [--check | --write] [--lines START:END]
//!   codestruct minify `<path>` [--no-legend] [--keep-docs] [-o FILE] [--stats]
//!   codestruct analyze `<paths>...` [--mappings]
//!   codestruct hash `<path>` [--all]
//!   codestruct diff `<old>` `<new>`
//!   codestruct codes | legend
//!
//! Directories are searched recursively for `*.cst` files. Settings come from the embedded
//! defaults, then `./codestruct.toml` (or the file given with `--config`), then flags.
//!
//! Exit codes: 0 on success, 1 when `lint` reports diagnostics or `format --check` finds a
//! file to reformat (its diff is printed), 2 when a command could not run.

mod commands;
mod files;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use codestruct_config::Loader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn paths_arg() -> Arg {
    Arg::new("paths")
        .help("Files or directories to process")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
}

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(value_parser!(PathBuf))
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn cli() -> Command {
    Command::new("codestruct")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lint, format, hash and minify CodeStruct files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("lint")
                .about("Report diagnostics")
                .arg(paths_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .value_name("CODES")
                        .help("Only report these codes (comma separated, e.g. CS101,CS201)")
                        .value_delimiter(',')
                        .action(ArgAction::Append),
                )
                .arg(flag("no-fail", "Exit 0 even when diagnostics are reported")),
        )
        .subcommand(Command::new("codes").about("List diagnostic codes"))
        .subcommand(
            Command::new("format")
                .about("Rewrite files in canonical form")
                .arg(paths_arg())
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .help("Indentation unit")
                        .value_parser(["2", "4", "tab"]),
                )
                .arg(flag(
                    "placeholder-docs",
                    "Add placeholder docs to modules, classes and functions without one",
                ))
                .arg(flag(
                    "fix-attribute-keys",
                    "Rewrite PascalCase and UPPER_CASE attribute keys to camelCase",
                ))
                .arg(flag(
                    "check",
                    "Print a diff and exit 1 if any file would change, without writing",
                ))
                .arg(flag("write", "Write the result back to each file").conflicts_with("check"))
                .arg(
                    Arg::new("lines")
                        .long("lines")
                        .value_name("START:END")
                        .help("Only print entities declared in these lines (1-based, inclusive)")
                        .conflicts_with_all(["check", "write"]),
                ),
        )
        .subcommand(
            Command::new("minify")
                .about("Print the compact minified form")
                .arg(path_arg("path", "File to minify"))
                .arg(flag("no-legend", "Leave out the legend block"))
                .arg(flag("keep-docs", "Keep docs as dc:\"...\" children"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write to FILE instead of stdout")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(flag("stats", "Print the size reduction to stderr")),
        )
        .subcommand(
            Command::new("analyze")
                .about("Report how much minifying would save")
                .arg(paths_arg())
                .arg(flag("mappings", "Also list every abbreviation")),
        )
        .subcommand(Command::new("legend").about("Print the minified format legend"))
        .subcommand(
            Command::new("hash")
                .about("Print content hashes")
                .arg(path_arg("path", "File to hash"))
                .arg(flag("all", "Print every entity's hash, flagging stale hash ids")),
        )
        .subcommand(
            Command::new("diff")
                .about("Locate the smallest changed subtree between two files")
                .arg(path_arg("old", "Earlier version"))
                .arg(path_arg("new", "Later version")),
        )
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_loader(matches: &ArgMatches) -> Loader {
    let explicit = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    Loader::discover(explicit, Path::new("."))
}

fn run(name: &str, matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let loader = config_loader(matches);
    match name {
        "lint" => commands::lint(matches, loader),
        "codes" => commands::codes(),
        "format" => commands::format(matches, loader),
        "minify" => commands::minify(matches, loader),
        "analyze" => commands::analyze(matches, loader),
        "legend" => commands::legend(),
        "hash" => commands::hash(matches),
        "diff" => commands::diff(matches),
        other => anyhow::bail!("unknown command '{}'", other),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        return ExitCode::from(2);
    };
    init_logging(sub.get_count("verbose"));

    match run(name, sub) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
