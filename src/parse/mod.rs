pub mod classifier;
pub mod dispatcher;
pub mod numbered;
pub mod prose;
pub mod registry;
pub mod segmenter;
pub mod verse;

pub use dispatcher::Dispatcher;

use crate::config::{BookMetadata, ParseMode};
use crate::models::{Chapter, Diagnostic};

/// Trait for the per-mode text-to-chapters parsers.
pub trait BookParser: Send + Sync {
    /// Mode this parser implements.
    fn mode(&self) -> ParseMode;

    /// Parse raw text into chapters in output order, reporting recoverable
    /// problems to `diagnostics`.
    fn parse_chapters(
        &self,
        source: &str,
        metadata: &BookMetadata,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Chapter>;
}

/// Collector for recoverable problems. Every entry is also logged.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = diagnostic.kind.as_str(), "{diagnostic}");
        self.entries.push(diagnostic);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
