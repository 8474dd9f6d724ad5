// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::fn_params_excessive_bools,
    clippy::needless_pass_by_value
)]

use std::path::Path;

use clap::Parser;

use versebook::cli::commands::{Cli, Command};
use versebook::cli::output;
use versebook::config::{BookConfig, BookMetadata, ParseMode};
use versebook::converter;
use versebook::diagnostics_log::{self, DiagnosticsLogger};
use versebook::models::DiagnosticKind;
use versebook::runner::{self, RunOptions};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Command::Convert {
            manifest,
            input,
            output,
            strict,
            diagnostics_log,
        } => cmd_convert(
            &manifest,
            RunOptions {
                strict,
                input,
                output,
                diagnostics_log,
            },
        ),
        Command::ConvertAll {
            dir,
            strict,
            diagnostics_log,
        } => cmd_convert_all(
            &dir,
            RunOptions {
                strict,
                diagnostics_log,
                ..RunOptions::default()
            },
        ),
        Command::Preview {
            input,
            mode,
            title,
            slug,
            author,
            language,
            diagnostics,
        } => {
            let stem = file_stem(&input);
            let mut metadata = BookMetadata::new(
                title.unwrap_or_else(|| stem.clone()),
                slug.unwrap_or(stem),
            );
            metadata.author = author;
            metadata.language = language;
            cmd_preview(&input, mode, metadata, diagnostics)
        }
        Command::Modes => cmd_modes(),
        Command::Diagnostics {
            log,
            kind,
            summary,
            clear,
        } => cmd_diagnostics(&log, kind, summary, clear),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "book".to_string(), |s| s.to_string_lossy().into_owned())
}

fn cmd_convert(manifest: &Path, options: RunOptions) -> CmdResult {
    let config = BookConfig::load(manifest).map_err(map_err)?;
    let report = runner::run_book(&config, &options).map_err(map_err)?;
    println!("{}", output::format_json(&report));
    Ok(())
}

fn cmd_convert_all(dir: &Path, options: RunOptions) -> CmdResult {
    if !dir.is_dir() {
        return Err(map_err(format!("not a directory: {}", dir.display())));
    }
    let report = runner::run_all(dir, &options);
    println!("{}", output::format_json(&report));
    if report.failed > 0 {
        return Err(map_err(format!(
            "{} of {} book(s) failed",
            report.failed, report.manifests
        )));
    }
    if report.log_failures > 0 {
        return Err(map_err(format!(
            "diagnostics could not be logged for {} book(s)",
            report.log_failures
        )));
    }
    Ok(())
}

fn cmd_preview(
    input: &Path,
    mode: ParseMode,
    metadata: BookMetadata,
    show_diagnostics: bool,
) -> CmdResult {
    metadata.validate().map_err(map_err)?;
    let source = runner::read_source(input).map_err(map_err)?;
    let conversion = converter::convert(&source, &metadata, mode).map_err(map_err)?;

    if show_diagnostics {
        #[derive(serde::Serialize)]
        struct DiagnosticsOutput {
            count: usize,
            diagnostics: Vec<versebook::models::Diagnostic>,
        }
        println!(
            "{}",
            output::format_json(&DiagnosticsOutput {
                count: conversion.diagnostics.len(),
                diagnostics: conversion.diagnostics,
            })
        );
    } else {
        print!("{}", converter::render(&conversion.book).map_err(map_err)?);
    }
    Ok(())
}

fn cmd_modes() -> CmdResult {
    println!("{}", output::format_pretty(&output::mode_list()));
    Ok(())
}

fn cmd_diagnostics(
    log: &Path,
    kind: Option<DiagnosticKind>,
    summary: bool,
    clear: bool,
) -> CmdResult {
    if clear {
        DiagnosticsLogger::new(log).clear().map_err(map_err)?;
        println!("{{\"cleared\":true}}");
        return Ok(());
    }

    let mut entries = diagnostics_log::read_log(log).map_err(map_err)?;
    if let Some(kind) = kind {
        entries = diagnostics_log::filter_kind(entries, kind);
    }

    if summary {
        println!("{}", output::format_json(&diagnostics_log::summarize(&entries)));
    } else {
        #[derive(serde::Serialize)]
        struct LogOutput {
            count: usize,
            entries: Vec<diagnostics_log::LogEntry>,
        }
        println!(
            "{}",
            output::format_json(&LogOutput {
                count: entries.len(),
                entries,
            })
        );
    }
    Ok(())
}
