use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ParseMode;
use crate::models::DiagnosticKind;

#[derive(Parser)]
#[command(
    name = "versebook",
    version,
    about = "Convert numbered and sectioned source texts into structured reader books",
    after_help = "Each book is described by a book.toml (or <name>.book.toml) manifest holding \
                  its metadata, parse mode and input/output paths. Results are printed as JSON \
                  on stdout; logs go to stderr (set RUST_LOG for more detail)."
)]
pub struct Cli {
    /// Log progress at info level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert one book described by a manifest.
    ///
    /// Relative input and output paths resolve against the manifest's directory.
    /// An output that already matches the new document byte for byte is not rewritten.
    Convert {
        /// Path to the book manifest
        manifest: PathBuf,
        /// Read the source text from this file instead
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Write the document to this file instead
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail when any diagnostic is produced
        #[arg(long)]
        strict: bool,
        /// Append diagnostics to a JSONL log
        #[arg(long)]
        diagnostics_log: Option<PathBuf>,
    },

    /// Convert every manifest found below a directory, in parallel.
    ///
    /// Respects .gitignore and skips hidden and target directories.
    /// Exits non-zero when any book fails.
    ConvertAll {
        /// Directory to search (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Fail a book when any diagnostic is produced
        #[arg(long)]
        strict: bool,
        /// Append diagnostics to a JSONL log
        #[arg(long)]
        diagnostics_log: Option<PathBuf>,
    },

    /// Convert a text file and print the document without writing it
    Preview {
        /// Source text file
        input: PathBuf,
        /// Parse mode
        #[arg(short, long, value_enum)]
        mode: ParseMode,
        /// Book title (default: file stem)
        #[arg(long)]
        title: Option<String>,
        /// Book slug (default: file stem)
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        language: String,
        /// Print diagnostics instead of the document
        #[arg(long)]
        diagnostics: bool,
    },

    /// List supported parse modes
    Modes,

    /// Show entries from a diagnostics log
    Diagnostics {
        /// Path to the JSONL log
        log: PathBuf,
        /// Only show entries of this kind
        #[arg(short, long, value_enum)]
        kind: Option<DiagnosticKind>,
        /// Show counts per book and kind instead of entries
        #[arg(short, long)]
        summary: bool,
        /// Delete the log
        #[arg(long)]
        clear: bool,
    },
}
