//! Command-line interface for dotora
//! Inspect and edit Oracle dot-ora files (tnsnames.ora, sqlnet.ora, listener.ora).
//!
//! Usage:
//!   dotora show `<path>` [--format `<format>`]             - Print the file in a registered format
//!   dotora get `<path>` `<alias>` [--path `<attr-path>`]      - Print an alias value or one scalar
//!   dotora edit `<path>` --alias `<alias>` [options]         - Apply one edit and print the result
//!
//! Exit codes: 0 on success, 1 when `get` finds nothing, 2 on any error.

use clap::{Arg, ArgAction, ArgMatches, Command};
use dotora::dotora::ast::{format_source_context, DotOraError, MalformedDescriptor};
use dotora::dotora::config::{DotOraConfig, Loader};
use dotora::dotora::editing::{apply, EditRequest, State};
use dotora::dotora::formats::FormatRegistry;
use dotora::dotora::{AttrPath, DotOraFile};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("dotora")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit Oracle dot-ora configuration files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("show")
                .about("Print a dot-ora file in one of the registered formats")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: ora, treeviz, json, yaml (default from config)"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Print the value of an alias, or of one attribute below it")
                .arg(path_arg())
                .arg(Arg::new("alias").help("Alias to look up").required(true).index(2))
                .arg(
                    Arg::new("attr-path")
                        .long("path")
                        .short('p')
                        .help("Attribute path below the alias, e.g. DESCRIPTION.ADDRESS.HOST"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Apply a single edit and print the resulting file")
                .arg(path_arg())
                .arg(
                    Arg::new("alias")
                        .long("alias")
                        .short('a')
                        .required(true)
                        .help("Alias to edit, or @all"),
                )
                .arg(
                    Arg::new("state")
                        .long("state")
                        .value_parser(["present", "absent"])
                        .default_value("present"),
                )
                .arg(Arg::new("whole-value").long("whole-value").help("Replace the entire value"))
                .arg(
                    Arg::new("attribute-path")
                        .long("attribute-path")
                        .help("Path to the attribute to set or delete"),
                )
                .arg(
                    Arg::new("attribute-name")
                        .long("attribute-name")
                        .help("Top-level attribute to set or delete"),
                )
                .arg(Arg::new("attribute-value").long("attribute-value"))
                .arg(
                    Arg::new("old-value")
                        .long("old-value")
                        .help("Only replace attribute-name values currently equal to this"),
                )
                .arg(
                    Arg::new("in-place")
                        .long("in-place")
                        .short('i')
                        .action(ArgAction::SetTrue)
                        .help("Write the result back to the file instead of printing it"),
                )
                .arg(
                    Arg::new("no-follow")
                        .long("no-follow")
                        .action(ArgAction::SetTrue)
                        .help("Do not resolve symlinks before writing"),
                ),
        )
        .get_matches();

    init_logging();
    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("show", show_matches)) => handle_show_command(show_matches, &config),
        Some(("get", get_matches)) => handle_get_command(get_matches),
        Some(("edit", edit_matches)) => handle_edit_command(edit_matches, &config),
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the dot-ora file")
        .required(true)
        .index(1)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(2);
}

fn load_config(path: Option<&String>) -> DotOraConfig {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(format!("invalid configuration: {}", e)))
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| unreachable!("clap enforces required argument {}", name))
}

fn read_source(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read {}: {}", path.display(), e)))
}

fn report_malformed(path: &Path, source: &str, error: &MalformedDescriptor) -> ! {
    eprintln!("Error: {}: {}", path.display(), error);
    eprint!("{}", format_source_context(source, error.position));
    process::exit(2);
}

fn parse_file(path: &Path, source: &str) -> DotOraFile {
    let file = DotOraFile::parse(source).unwrap_or_else(|e| report_malformed(path, source, &e));
    print_warnings(file.warnings());
    file
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Handle the show command
fn handle_show_command(matches: &ArgMatches, config: &DotOraConfig) {
    let path = PathBuf::from(required(matches, "path"));
    let format = matches
        .get_one::<String>("format")
        .unwrap_or(&config.editing.default_format);

    let source = read_source(&path);
    let file = parse_file(&path, &source);

    let registry = FormatRegistry::with_options(config.formatting.to_options());
    let output = registry.serialize(&file, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available formats:");
        for line in registry.describe() {
            eprintln!("  {}", line);
        }
        process::exit(2);
    });
    print!("{}", output);
}

/// Handle the get command
fn handle_get_command(matches: &ArgMatches) {
    let path = PathBuf::from(required(matches, "path"));
    let alias = required(matches, "alias");

    let source = read_source(&path);
    let file = parse_file(&path, &source);

    let value = match matches.get_one::<String>("attr-path") {
        Some(attr_path) => {
            let attr_path = AttrPath::parse(attr_path).unwrap_or_else(|e| fail(e));
            file.lookup(alias, &attr_path).map(str::to_string)
        }
        None => file.param(alias).map(|_| file.alias_value(alias)),
    };

    match value {
        Some(value) => println!("{}", value),
        None => process::exit(1),
    }
}

/// Handle the edit command
fn handle_edit_command(matches: &ArgMatches, config: &DotOraConfig) {
    let given = PathBuf::from(required(matches, "path"));
    let follow = config.editing.follow_symlinks && !matches.get_flag("no-follow");
    let path = if follow {
        fs::canonicalize(&given)
            .unwrap_or_else(|e| fail(format!("cannot resolve {}: {}", given.display(), e)))
    } else {
        given
    };

    let state = State::parse(required(matches, "state"))
        .unwrap_or_else(|| unreachable!("clap restricts --state values"));
    let request = EditRequest {
        state,
        alias: required(matches, "alias").to_string(),
        whole_value: matches.get_one::<String>("whole-value").cloned(),
        attribute_path: matches.get_one::<String>("attribute-path").cloned(),
        attribute_name: matches.get_one::<String>("attribute-name").cloned(),
        attribute_value: matches.get_one::<String>("attribute-value").cloned(),
        old_value: matches.get_one::<String>("old-value").cloned(),
    };

    let source = read_source(&path);
    let outcome = match apply(&source, &request, &config.formatting.to_options()) {
        Ok(outcome) => outcome,
        Err(DotOraError::Malformed(e)) => report_malformed(&path, &source, &e),
        Err(e) => fail(e),
    };
    print_warnings(&outcome.warnings);

    if matches.get_flag("in-place") {
        if outcome.changed {
            write_atomically(&path, &outcome.content)
                .unwrap_or_else(|e| fail(format!("cannot write {}: {}", path.display(), e)));
        }
    } else {
        print!("{}", outcome.content);
    }

    eprintln!("changed={}", outcome.changed);
    eprintln!("{}", outcome.message());
}

/// Replace `path` with `content` via a temporary file in the same directory
fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
