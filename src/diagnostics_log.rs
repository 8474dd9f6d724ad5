//! Diagnostics log.
//!
//! Appends conversion diagnostics to a JSONL file, one entry per line, so
//! problems in source transcriptions can be tracked across runs.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Diagnostic, DiagnosticKind};

/// A diagnostic tagged with the book it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp in ISO 8601 format (UTC).
    pub ts: String,
    /// Slug of the converted book.
    pub book: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl LogEntry {
    #[must_use]
    pub fn new(book: &str, diagnostic: Diagnostic) -> Self {
        Self {
            ts: utc_timestamp(),
            book: book.to_string(),
            diagnostic,
        }
    }
}

/// Appends entries to a JSONL file, creating parent directories as needed.
pub struct DiagnosticsLogger {
    log_path: PathBuf,
}

impl DiagnosticsLogger {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// Append all diagnostics of one book.
    pub fn log_book(&self, book: &str, diagnostics: &[Diagnostic]) -> Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        for diagnostic in diagnostics {
            let entry = LogEntry::new(book, diagnostic.clone());
            writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        }
        Ok(())
    }

    /// Remove the log file.
    pub fn clear(&self) -> Result<()> {
        if self.log_path.exists() {
            std::fs::remove_file(&self.log_path)?;
        }
        Ok(())
    }
}

/// Read a diagnostics log. Missing files read as empty; unparsable lines are skipped.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::debug!(error = %e, "skipping unreadable log line"),
        }
    }
    Ok(entries)
}

/// Counts of logged diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub total: usize,
    pub by_book: BTreeMap<String, usize>,
    pub by_kind: BTreeMap<String, usize>,
}

#[must_use]
pub fn summarize(entries: &[LogEntry]) -> LogSummary {
    let mut summary = LogSummary {
        total: entries.len(),
        ..LogSummary::default()
    };
    for entry in entries {
        *summary.by_book.entry(entry.book.clone()).or_default() += 1;
        *summary
            .by_kind
            .entry(entry.diagnostic.kind.as_str().to_string())
            .or_default() += 1;
    }
    summary
}

/// Keep only entries of the given kind.
#[must_use]
pub fn filter_kind(entries: Vec<LogEntry>, kind: DiagnosticKind) -> Vec<LogEntry> {
    entries
        .into_iter()
        .filter(|e| e.diagnostic.kind == kind)
        .collect()
}

fn utc_timestamp() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Gregorian date for a day count since 1970-01-01 (Howard Hinnant's algorithm).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
