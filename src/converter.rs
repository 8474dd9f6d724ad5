//! Text-to-document conversion.
//!
//! [`convert`] is a pure function from raw text, book metadata and mode to a
//! [`Conversion`]; it does no file I/O. [`render`] turns the resulting book
//! into the pretty-printed JSON written to disk.

use crate::config::{BookMetadata, ParseMode};
use crate::error::{ConvertError, Result};
use crate::models::{Book, Diagnostic};
use crate::parse::{Diagnostics, Dispatcher};

/// A finished book plus the advisory diagnostics collected on the way.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub book: Book,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reusable converter holding the per-mode parsers.
pub struct Converter {
    dispatcher: Dispatcher,
    strict: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            strict: false,
        }
    }

    /// In strict mode any diagnostic fails the conversion.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn convert(
        &self,
        source: &str,
        metadata: &BookMetadata,
        mode: ParseMode,
    ) -> Result<Conversion> {
        let conversion = self.convert_permissive(source, metadata, mode);
        if self.strict {
            ensure_clean(&conversion.book.slug, &conversion.diagnostics)?;
        }
        Ok(conversion)
    }

    /// Convert ignoring the strict flag; diagnostics are always returned.
    #[must_use]
    pub fn convert_permissive(
        &self,
        source: &str,
        metadata: &BookMetadata,
        mode: ParseMode,
    ) -> Conversion {
        let mut diagnostics = Diagnostics::new();
        let chapters = self
            .dispatcher
            .parse(mode, source, metadata, &mut diagnostics);
        let diagnostics = diagnostics.into_vec();

        let book = Book {
            id: metadata.id.clone(),
            title: metadata.title.clone(),
            slug: metadata.slug.clone(),
            author: metadata.author.clone(),
            language: metadata.language.clone(),
            description: metadata.description.clone(),
            cover_image: metadata.cover_image.clone(),
            restricted: metadata.restricted,
            chapters,
        };
        tracing::debug!(
            slug = %book.slug,
            mode = %mode,
            chapters = book.chapters.len(),
            diagnostics = diagnostics.len(),
            "converted"
        );
        Conversion { book, diagnostics }
    }
}

/// Fail with [`ConvertError::Strict`] when any diagnostic was produced.
pub fn ensure_clean(slug: &str, diagnostics: &[Diagnostic]) -> Result<()> {
    match diagnostics.first() {
        Some(first) => Err(ConvertError::Strict {
            slug: slug.to_string(),
            count: diagnostics.len(),
            first: first.to_string(),
        }),
        None => Ok(()),
    }
}

/// Convert raw text permissively: diagnostics never fail the conversion.
pub fn convert(source: &str, metadata: &BookMetadata, mode: ParseMode) -> Result<Conversion> {
    Converter::new().convert(source, metadata, mode)
}

/// Pretty-print a book as JSON with 2-space indentation and a trailing newline.
pub fn render(book: &Book) -> Result<String> {
    let mut json = serde_json::to_string_pretty(book)?;
    json.push('\n');
    Ok(json)
}
