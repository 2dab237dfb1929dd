use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use pipecheck_analyzer::ast::{Document, SyntaxTree};
use pipecheck_common::config::{self, ConfigError};
use pipecheck_common::{Diagnostic, DiagnosticBag, PipecheckConfig, Position};

/// Pipeline configuration parameter checker.
///
/// Type-checks parameter assignments and resolves `<< parameters.X >>`
/// references in a parsed configuration snapshot.
#[derive(Parser)]
#[command(
    name = "pipecheck",
    version,
    about,
    long_about = "Pipeline configuration parameter checker.\n\nReads a JSON snapshot (source text, document model and syntax tree) produced\nby the configuration parser and reports parameter diagnostics.\n\nExamples:\n  pipecheck config.snapshot.json                 Check and print diagnostics\n  pipecheck config.snapshot.json --format json   Print diagnostics as JSON\n  pipecheck config.snapshot.json -c ci.toml      Use an explicit config file"
)]
struct Cli {
    /// Input snapshot file.
    snapshot: PathBuf,

    /// Configuration file (default: pipecheck.toml found by walking up).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Suppress warning output.
    #[arg(short, long)]
    quiet: bool,

    /// Print a confirmation line when no errors are found.
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

/// Everything the parser hands over for one configuration file.
#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    source: String,
    document: Document,
    tree: SyntaxTree,
}

#[derive(Debug, thiserror::Error)]
enum SnapshotError {
    #[error("could not read snapshot: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let snapshot = match load_snapshot(&cli.snapshot) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: '{}': {}", cli.snapshot.display(), e);
            process::exit(1);
        }
    };

    let file_name = if snapshot.document.file.is_empty() {
        cli.snapshot
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    } else {
        snapshot.document.file.clone()
    };

    // === Configuration ===
    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // === Analysis ===
    let diagnostics =
        pipecheck_analyzer::analyze_with_config(&snapshot.document, &snapshot.tree, &config);

    let failed = exit_failure(&diagnostics, &config);
    let shown = shown_diagnostics(&diagnostics, &config, cli.quiet);

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&shown) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize diagnostics: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Human => {
            for diag in &shown {
                print_diagnostic(diag, &snapshot.source, &file_name);
            }
        }
    }

    if failed {
        process::exit(1);
    }
    if cli.check && cli.format == OutputFormat::Human {
        println!("No errors found.");
    }
}

/// Warnings fail the run only under `check.warnings_as_errors`.
fn exit_failure(diagnostics: &DiagnosticBag, config: &PipecheckConfig) -> bool {
    diagnostics.has_errors() || (config.check.warnings_as_errors && diagnostics.has_warnings())
}

/// `--quiet` hides warnings unless they are what fails the run.
fn shown_diagnostics<'a>(
    diagnostics: &'a DiagnosticBag,
    config: &PipecheckConfig,
    quiet: bool,
) -> Vec<&'a Diagnostic> {
    let hide_warnings = quiet && !config.check.warnings_as_errors;
    diagnostics
        .diagnostics()
        .iter()
        .filter(|d| d.is_error() || !hide_warnings)
        .collect()
}

/// An explicit `--config` must load; a missing `pipecheck.toml` falls back to
/// defaults.
fn load_configuration(cli: &Cli) -> Result<PipecheckConfig, ConfigError> {
    if let Some(path) = &cli.config {
        return config::load_config(path);
    }
    let abs_snapshot = fs::canonicalize(&cli.snapshot).unwrap_or_else(|_| cli.snapshot.clone());
    match config::find_and_load_config(&abs_snapshot) {
        Err(ConfigError::NotFound(dir)) => {
            tracing::debug!(%dir, "no configuration file, using defaults");
            Ok(PipecheckConfig::default())
        }
        other => other,
    }
}

fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Byte offset of a 0-based line/character position in `source`.
///
/// Characters are Unicode scalar values. Positions past the end of a line
/// clamp to the line end; lines past the end of the source clamp to its
/// length.
fn byte_offset(source: &str, pos: Position) -> usize {
    let mut line_start = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index as u32 == pos.line {
            let content = line.trim_end_matches(['\n', '\r']);
            let within = content
                .char_indices()
                .nth(pos.character as usize)
                .map_or(content.len(), |(i, _)| i);
            return line_start + within;
        }
        line_start += line.len();
    }
    source.len()
}

fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) {
    let kind = if diag.is_error() {
        ReportKind::Error
    } else {
        ReportKind::Warning
    };

    if let Some(ref range) = diag.range {
        let start = byte_offset(source, range.start);
        let end = byte_offset(source, range.end).max(start + 1);

        let color = if diag.is_error() {
            Color::Red
        } else {
            Color::Yellow
        };

        let mut report = Report::build(kind, file_name, start)
            .with_message(&diag.message)
            .with_label(
                Label::new((file_name, start..end))
                    .with_message(&diag.message)
                    .with_color(color),
            );

        if let Some(ref suggestion) = diag.suggestion {
            report = report.with_help(suggestion);
        }

        if let Err(e) = report
            .finish()
            .eprint((file_name, Source::from(source)))
        {
            eprintln!("error: could not render diagnostic: {}", e);
        }
    } else {
        let prefix = if diag.is_error() { "error" } else { "warning" };
        eprintln!("{}: {}", prefix, diag.message);
        if let Some(ref suggestion) = diag.suggestion {
            eprintln!("   = help: {}", suggestion);
        }
        eprintln!();
    }
}
