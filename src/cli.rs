//! Command-line interface of the `ts-catalog` binary.
//!
//! Arguments are parsed by hand; the binary only has a handful of
//! subcommands and flags.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use serde::Serialize;

use crate::catalog::{
    Catalog,
    CatalogSet,
    CatalogStats,
    Diagnostic,
    LoadError,
    Severity,
    check_catalog,
};
use crate::config::{
    CatalogSettings,
    ConfigError,
    ConfigManager,
};
use crate::ts::{
    ParseError,
    parse_document,
    write_document,
};

/// Environment variable holding the log filter (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_ENV: &str = "TS_CATALOG_LOG";

pub const HELP_TEXT: &str = "\
ts-catalog: inspect Qt Linguist translation catalogs

USAGE:
    ts-catalog [OPTIONS] <COMMAND>

COMMANDS:
    lookup <FILE> <CONTEXT> <SOURCE>   Print the translation of a message
        --comment <COMMENT>            Disambiguation comment
        -n <N>                         Count for numerus messages
        --include-unfinished           Also serve unfinished translations
    check <PATH>                       Report catalog problems (file or workspace)
        --json                         Print diagnostics as JSON
    stats <FILE>                       Count messages per status
        --json                         Print statistics as JSON
    format <FILE>                      Rewrite a catalog in lupdate layout
        --output <OUT>                 Write to OUT instead of stdout

OPTIONS:
    --log-file <PATH>    Write logs to PATH instead of stderr
    --help, -h           Show this help message
    --                   Treat the remaining arguments as positional

ENVIRONMENT VARIABLES:
    TS_CATALOG_LOG       Log filter, e.g. 'debug' or 'ts_catalog=trace' (default: warn)";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Unknown command '{0}'. Run with --help for usage information")]
    UnknownCommand(String),

    #[error("Unknown argument '{0}'. Run with --help for usage information")]
    UnknownArg(String),

    #[error("Missing {0}. Run with --help for usage information")]
    MissingArgument(&'static str),

    #[error("Missing value for {0}")]
    MissingValue(&'static str),

    #[error("Invalid {flag} value: {value}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("Failed to load {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A subcommand with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Lookup {
        file: PathBuf,
        context: String,
        source: String,
        comment: Option<String>,
        count: Option<i64>,
        /// Overrides `includeUnfinished` of `.ts-catalog.json` when set.
        include_unfinished: bool,
    },
    Check {
        path: PathBuf,
        json: bool,
    },
    Stats {
        file: PathBuf,
        json: bool,
    },
    Format {
        file: PathBuf,
        output: Option<PathBuf>,
    },
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub command: Command,
    /// Log to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Outcome of a command, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Lookup miss, or warnings found by `check`.
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::Failure => Self::FAILURE,
        }
    }
}

impl Opts {
    /// Parse arguments, without the program name.
    ///
    /// # Errors
    /// Returns `CliError` for unknown commands or flags and missing or invalid values.
    pub fn parse_from_args<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut log_file = None;
        let mut json = false;
        let mut comment = None;
        let mut count = None;
        let mut include_unfinished = false;
        let mut output = None;
        let mut positional: Vec<String> = Vec::new();

        let mut args = args.into_iter().map(|arg| arg.as_ref().to_string());
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => {
                    return Ok(Self { command: Command::Help, log_file });
                }
                "--" => {
                    positional.extend(args.by_ref());
                    break;
                }
                "--json" => json = true,
                "--include-unfinished" => include_unfinished = true,
                "--log-file" => {
                    log_file = Some(PathBuf::from(next_value(&mut args, "--log-file")?));
                }
                "--comment" => comment = Some(next_value(&mut args, "--comment")?),
                "-n" => {
                    let value = next_value(&mut args, "-n")?;
                    count = Some(
                        value
                            .parse::<i64>()
                            .map_err(|_| CliError::InvalidValue { flag: "-n", value })?,
                    );
                }
                "--output" | "-o" => {
                    output = Some(PathBuf::from(next_value(&mut args, "--output")?));
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(CliError::UnknownArg(flag.to_string()));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(name) = positional.next() else {
            return Ok(Self { command: Command::Help, log_file });
        };
        let command = match name.as_str() {
            "lookup" => Command::Lookup {
                file: PathBuf::from(required(&mut positional, "catalog file")?),
                context: required(&mut positional, "context")?,
                source: required(&mut positional, "source text")?,
                comment,
                count,
                include_unfinished,
            },
            "check" => Command::Check {
                path: PathBuf::from(required(&mut positional, "catalog path")?),
                json,
            },
            "stats" => {
                Command::Stats { file: PathBuf::from(required(&mut positional, "catalog file")?), json }
            }
            "format" => Command::Format {
                file: PathBuf::from(required(&mut positional, "catalog file")?),
                output,
            },
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = positional.next() {
            return Err(CliError::UnknownArg(extra));
        }

        Ok(Self { command, log_file })
    }
}

/// Value following a flag.
fn next_value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, CliError> {
    args.next().ok_or(CliError::MissingValue(flag))
}

/// Next positional argument.
fn required(args: &mut impl Iterator<Item = String>, what: &'static str) -> Result<String, CliError> {
    args.next().ok_or(CliError::MissingArgument(what))
}

/// Run a parsed command, writing its output to `out`.
///
/// # Errors
/// Returns `CliError` when a catalog cannot be loaded or output cannot be written.
pub async fn run(command: &Command, out: &mut impl Write) -> Result<Status, CliError> {
    match command {
        Command::Help => {
            writeln!(out, "{HELP_TEXT}")?;
            Ok(Status::Success)
        }
        Command::Lookup { file, context, source, comment, count, include_unfinished } => {
            let settings = load_settings(file.parent(), *include_unfinished)?;
            let catalog = load_catalog(file)?.with_unfinished(settings.include_unfinished);
            let comment = comment.as_deref();
            let found = match count {
                Some(n) => catalog.lookup_plural(context, source, *n, comment),
                None => catalog.lookup(context, source, comment).map(ToString::to_string),
            };
            if let Some(text) = found {
                writeln!(out, "{text}")?;
                Ok(Status::Success)
            } else {
                let fallback = count.map_or_else(
                    || source.clone(),
                    |n| catalog.translate_plural(context, source, n, comment),
                );
                writeln!(out, "{fallback}")?;
                Ok(Status::Failure)
            }
        }
        Command::Check { path, json } => check(path, *json, out).await,
        Command::Stats { file, json } => {
            let stats = CatalogStats::collect(&load_catalog(file)?);
            if *json {
                serde_json::to_writer_pretty(&mut *out, &stats)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{stats}")?;
            }
            Ok(Status::Success)
        }
        Command::Format { file, output } => {
            let text = std::fs::read_to_string(file)?;
            let document = parse_document(&text)
                .map_err(|source| CliError::Catalog { path: file.clone(), source })?;
            let formatted = write_document(&document);
            match output {
                Some(output) => std::fs::write(output, formatted)?,
                None => out.write_all(formatted.as_bytes())?,
            }
            Ok(Status::Success)
        }
    }
}

/// Settings from `.ts-catalog.json` in `root`, with command-line overrides applied.
fn load_settings(root: Option<&Path>, include_unfinished: bool) -> Result<CatalogSettings, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(root)?;
    if include_unfinished {
        config_manager.update_settings(CatalogSettings {
            include_unfinished: true,
            ..config_manager.get_settings().clone()
        })?;
    }
    Ok(config_manager.get_settings().clone())
}

/// Load a catalog, keeping its path in the error.
fn load_catalog(path: &Path) -> Result<Catalog, CliError> {
    Catalog::load(path).map_err(|source| CliError::Catalog { path: path.to_path_buf(), source })
}

/// Diagnostics of one catalog file, as printed by `check --json`.
#[derive(Debug, Serialize)]
struct CatalogReport<'a> {
    /// Catalog file.
    path: &'a Path,
    /// Findings in document order.
    diagnostics: Vec<Diagnostic>,
}

/// `check`: a single file, or every catalog of a workspace directory.
async fn check(path: &Path, json: bool, out: &mut impl Write) -> Result<Status, CliError> {
    let settings = load_settings(if path.is_dir() { Some(path) } else { path.parent() }, false)?;
    let catalogs = if path.is_dir() {
        CatalogSet::load_workspace(path, &settings).await?
    } else {
        CatalogSet::from_catalogs(vec![load_catalog(path)?])
    };
    let config = settings.diagnostics;

    let reports: Vec<CatalogReport<'_>> = catalogs
        .catalogs()
        .iter()
        .map(|catalog| CatalogReport {
            path: catalog.path().unwrap_or(path),
            diagnostics: check_catalog(catalog, &config),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
    } else {
        for report in &reports {
            for diagnostic in &report.diagnostics {
                writeln!(out, "{}: {diagnostic}", report.path.display())?;
            }
        }
    }

    let has_warning = reports
        .iter()
        .flat_map(|report| &report.diagnostics)
        .any(|diagnostic| diagnostic.severity == Severity::Warning);
    Ok(if has_warning { Status::Failure } else { Status::Success })
}
