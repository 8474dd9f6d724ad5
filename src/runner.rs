//! File-level conversion runs.
//!
//! Reads a book's source text, converts it, and writes the rendered document
//! next to its manifest. Output is staged in a temp file and persisted
//! atomically; an output that already holds the same bytes is left alone.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::config::BookConfig;
use crate::converter::{ensure_clean, render, Conversion, Converter};
use crate::diagnostics_log::DiagnosticsLogger;
use crate::error::{ConvertError, Result};
use crate::hasher;
use crate::models::Diagnostic;
use crate::scanner::Scanner;

/// Knobs shared by single and batch runs.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Force strict mode regardless of the manifest.
    pub strict: bool,
    /// Override the manifest's input path.
    pub input: Option<PathBuf>,
    /// Override the manifest's output path.
    pub output: Option<PathBuf>,
    /// Append diagnostics to this JSONL file.
    pub diagnostics_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Written,
    Unchanged,
}

/// Summary of one converted book.
#[derive(Debug, Clone, Serialize)]
pub struct BookReport {
    pub slug: String,
    pub output: String,
    pub status: BookStatus,
    pub chapters: usize,
    pub paragraphs: usize,
    pub diagnostics: usize,
}

/// Result of one manifest in a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BookOutcome {
    pub manifest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BookReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the book's diagnostics could not be appended to the log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_error: Option<String>,
}

/// Statistics from a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub manifests: usize,
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Books whose diagnostics could not be logged.
    pub log_failures: usize,
    pub books: Vec<BookOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.log_failures > 0
    }
}

/// One book's conversion: its diagnostics survive even when the run fails.
struct BookRun {
    slug: String,
    diagnostics: Vec<Diagnostic>,
    result: Result<BookReport>,
}

impl BookRun {
    fn failed(slug: &str, error: ConvertError) -> Self {
        Self {
            slug: slug.to_string(),
            diagnostics: Vec::new(),
            result: Err(error),
        }
    }
}

/// Read a source text, mapping a missing file to [`ConvertError::InputNotFound`].
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConvertError::InputNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConvertError::Io(e)
        }
    })
}

/// Convert one book and write its output file.
///
/// Diagnostics are logged before a strict-mode failure is returned.
pub fn run_book(config: &BookConfig, options: &RunOptions) -> Result<BookReport> {
    let run = convert_book(config, options);
    let logged = match &options.diagnostics_log {
        Some(log_path) => DiagnosticsLogger::new(log_path).log_book(&run.slug, &run.diagnostics),
        None => Ok(()),
    };
    let report = run.result?;
    logged?;
    Ok(report)
}

/// Convert every manifest found under `root`. Books are independent; one
/// failure, including a failed log write, does not stop the others.
#[must_use]
pub fn run_all(root: &Path, options: &RunOptions) -> BatchReport {
    let manifests = Scanner::new(root).manifests();
    let batch = RunOptions {
        input: None,
        output: None,
        ..options.clone()
    };

    let runs: Vec<(PathBuf, BookRun)> = manifests
        .par_iter()
        .map(|path| {
            let run = match BookConfig::load(path) {
                Ok(cfg) => convert_book(&cfg, &batch),
                Err(e) => BookRun::failed("", e),
            };
            (path.clone(), run)
        })
        .collect();

    let logger = options.diagnostics_log.as_ref().map(DiagnosticsLogger::new);
    let mut report = BatchReport {
        manifests: runs.len(),
        ..BatchReport::default()
    };
    for (path, run) in runs {
        let manifest = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        let log_error = match &logger {
            Some(logger) => logger
                .log_book(&run.slug, &run.diagnostics)
                .err()
                .map(|e| e.to_string()),
            None => None,
        };
        if let Some(e) = &log_error {
            tracing::warn!(manifest = %manifest, error = %e, "could not log diagnostics");
            report.log_failures += 1;
        }

        let outcome = match run.result {
            Ok(book) => {
                match book.status {
                    BookStatus::Written => report.written += 1,
                    BookStatus::Unchanged => report.unchanged += 1,
                }
                BookOutcome {
                    manifest,
                    report: Some(book),
                    error: None,
                    log_error,
                }
            }
            Err(e) => {
                tracing::error!(manifest = %manifest, error = %e, "conversion failed");
                report.failed += 1;
                BookOutcome {
                    manifest,
                    report: None,
                    error: Some(e.to_string()),
                    log_error,
                }
            }
        };
        report.books.push(outcome);
    }

    tracing::info!(
        manifests = report.manifests,
        written = report.written,
        unchanged = report.unchanged,
        failed = report.failed,
        log_failures = report.log_failures,
        "batch finished"
    );
    report
}

fn convert_book(config: &BookConfig, options: &RunOptions) -> BookRun {
    let input_path = options.input.as_deref().unwrap_or(&config.input_path);
    let source = match read_source(input_path) {
        Ok(source) => source,
        Err(e) => return BookRun::failed(config.slug(), e),
    };

    let conversion = Converter::new().convert_permissive(
        &source,
        &config.manifest.metadata,
        config.mode(),
    );
    let strict = options.strict || config.manifest.strict;
    let result = if strict {
        ensure_clean(config.slug(), &conversion.diagnostics)
    } else {
        Ok(())
    }
    .and_then(|()| write_book(config, options, &conversion));

    BookRun {
        slug: config.slug().to_string(),
        diagnostics: conversion.diagnostics,
        result,
    }
}

fn write_book(
    config: &BookConfig,
    options: &RunOptions,
    conversion: &Conversion,
) -> Result<BookReport> {
    let output_path = options.output.as_deref().unwrap_or(&config.output_path);
    let rendered = render(&conversion.book)?;

    let status = if hasher::is_unchanged(output_path, &rendered) {
        BookStatus::Unchanged
    } else {
        write_atomic(output_path, &rendered)?;
        BookStatus::Written
    };

    let report = BookReport {
        slug: conversion.book.slug.clone(),
        output: output_path.display().to_string(),
        status,
        chapters: conversion.book.chapters.len(),
        paragraphs: conversion.book.paragraph_count(),
        diagnostics: conversion.diagnostics.len(),
    };
    tracing::info!(
        slug = %report.slug,
        mode = %config.mode(),
        chapters = report.chapters,
        diagnostics = report.diagnostics,
        status = ?report.status,
        "book converted"
    );
    Ok(report)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics_log::read_log;
    use tempfile::TempDir;

    const MANIFEST: &str = "title = \"Reader\"\nslug = \"reader\"\nmode = \"prose\"\n";
    const TEXT: &str = "[Chapter]\nTitle: One\n[Vocab]\nλόγος|word|logos.png\n[Content]\nἐν ἀρχῇ ἦν ὁ λόγος.\n";

    fn book_dir(tmp: &TempDir, name: &str, manifest: &str, text: &str) -> PathBuf {
        let dir = tmp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("book.toml"), manifest).unwrap();
        fs::write(dir.join("reader.txt"), text).unwrap();
        dir.join("book.toml")
    }

    #[test]
    fn run_book_writes_output() {
        let tmp = TempDir::new().unwrap();
        let manifest = book_dir(&tmp, "reader", MANIFEST, TEXT);
        let cfg = BookConfig::load(&manifest).unwrap();

        let report = run_book(&cfg, &RunOptions::default()).unwrap();
        assert_eq!(report.slug, "reader");
        assert_eq!(report.status, BookStatus::Written);
        assert_eq!(report.chapters, 1);
        assert_eq!(report.paragraphs, 1);
        assert_eq!(report.diagnostics, 0);

        let json = fs::read_to_string(&cfg.output_path).unwrap();
        assert!(json.contains("\"slug\": \"reader\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn second_run_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let manifest = book_dir(&tmp, "reader", MANIFEST, TEXT);
        let cfg = BookConfig::load(&manifest).unwrap();

        run_book(&cfg, &RunOptions::default()).unwrap();
        let second = run_book(&cfg, &RunOptions::default()).unwrap();
        assert_eq!(second.status, BookStatus::Unchanged);
    }

    #[test]
    fn missing_input_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("reader");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("book.toml"), MANIFEST).unwrap();
        let cfg = BookConfig::load(dir.join("book.toml")).unwrap();

        let err = run_book(&cfg, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
        assert!(!cfg.output_path.exists());
    }

    #[test]
    fn strict_failure_leaves_no_output() {
        let tmp = TempDir::new().unwrap();
        let manifest = book_dir(&tmp, "reader", MANIFEST, "[Chapter]\n[Vocab]\nbroken\n");
        let cfg = BookConfig::load(&manifest).unwrap();
        let options = RunOptions {
            strict: true,
            ..RunOptions::default()
        };

        let err = run_book(&cfg, &options).unwrap_err();
        assert!(matches!(err, ConvertError::Strict { .. }));
        assert!(!cfg.output_path.exists());
    }

    #[test]
    fn strict_failure_still_logs_diagnostics() {
        let tmp = TempDir::new().unwrap();
        let manifest = book_dir(&tmp, "reader", MANIFEST, "[Chapter]\n[Vocab]\nbroken\n");
        let cfg = BookConfig::load(&manifest).unwrap();
        let log = tmp.path().join("diagnostics.jsonl");
        let options = RunOptions {
            strict: true,
            diagnostics_log: Some(log.clone()),
            ..RunOptions::default()
        };

        let err = run_book(&cfg, &options).unwrap_err();
        assert!(matches!(err, ConvertError::Strict { count: 2, .. }));
        assert!(!cfg.output_path.exists());

        let entries = read_log(&log).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].book, "reader");
    }

    #[test]
    fn run_all_logs_strict_failures() {
        let tmp = TempDir::new().unwrap();
        book_dir(&tmp, "reader", MANIFEST, "[Chapter]\n[Questions]\nno answer\n");
        let log = tmp.path().join("diagnostics.jsonl");
        let options = RunOptions {
            strict: true,
            diagnostics_log: Some(log.clone()),
            ..RunOptions::default()
        };

        let report = run_all(tmp.path(), &options);
        assert_eq!(report.failed, 1);
        assert_eq!(read_log(&log).unwrap().len(), 2);
    }

    #[test]
    fn log_write_failure_keeps_batch_report() {
        let tmp = TempDir::new().unwrap();
        book_dir(&tmp, "reader", MANIFEST, "[Chapter]\n[Vocab]\nbroken\n");
        let log_dir = tmp.path().join("log-is-a-dir");
        fs::create_dir_all(&log_dir).unwrap();
        let options = RunOptions {
            diagnostics_log: Some(log_dir),
            ..RunOptions::default()
        };

        let report = run_all(tmp.path(), &options);
        assert_eq!(report.manifests, 1);
        assert_eq!(report.written, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.log_failures, 1);
        assert!(report.has_failures());
        assert!(report.books[0].report.is_some());
        assert!(report.books[0].log_error.is_some());
        assert!(tmp.path().join("reader/reader.json").exists());
    }

    #[test]
    fn overrides_and_diagnostics_log() {
        let tmp = TempDir::new().unwrap();
        let manifest = book_dir(&tmp, "reader", MANIFEST, "[Chapter]\n[Vocab]\nbroken\n");
        let cfg = BookConfig::load(&manifest).unwrap();
        let out = tmp.path().join("dist/nested/reader.json");
        let log = tmp.path().join("diagnostics.jsonl");
        let options = RunOptions {
            output: Some(out.clone()),
            diagnostics_log: Some(log.clone()),
            ..RunOptions::default()
        };

        let report = run_book(&cfg, &options).unwrap();
        assert!(out.exists());
        assert!(!cfg.output_path.exists());
        assert_eq!(report.diagnostics, 2);

        let entries = read_log(&log).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.book == "reader"));
    }

    #[test]
    fn run_all_converts_each_book() {
        let tmp = TempDir::new().unwrap();
        book_dir(&tmp, "good", MANIFEST, TEXT);
        book_dir(
            &tmp,
            "bad",
            "title = \"Bad\"\nslug = \"bad\"\nmode = \"sonnet\"\n",
            TEXT,
        );
        let verse = tmp.path().join("verse");
        fs::create_dir_all(&verse).unwrap();
        fs::write(
            verse.join("trallians.book.toml"),
            "title = \"Trallians\"\nslug = \"trallians\"\nmode = \"verse\"\n",
        )
        .unwrap();
        fs::write(verse.join("trallians.txt"), "1.1 Ἰγνάτιος\n").unwrap();

        let report = run_all(tmp.path(), &RunOptions::default());
        assert_eq!(report.manifests, 3);
        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 1);
        assert!(report.has_failures());
        assert!(tmp.path().join("verse/trallians.json").exists());

        let failed: Vec<_> = report.books.iter().filter(|b| b.error.is_some()).collect();
        assert_eq!(failed[0].manifest, "bad/book.toml");

        let again = run_all(tmp.path(), &RunOptions::default());
        assert_eq!(again.unchanged, 2);
        assert_eq!(again.written, 0);
    }
}
