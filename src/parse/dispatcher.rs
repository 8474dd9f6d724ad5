use std::collections::HashMap;

use crate::config::{BookMetadata, ParseMode};
use crate::models::Chapter;
use crate::parse::numbered::NumberedParser;
use crate::parse::prose::ProseParser;
use crate::parse::verse::VerseParser;
use crate::parse::{BookParser, Diagnostics};

/// Routes a conversion to the parser for its mode.
pub struct Dispatcher {
    parsers: HashMap<ParseMode, Box<dyn BookParser>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let mut parsers: HashMap<ParseMode, Box<dyn BookParser>> = HashMap::new();
        let all: [Box<dyn BookParser>; 4] = [
            Box::new(VerseParser::new()),
            Box::new(ProseParser::new()),
            Box::new(NumberedParser::keyed()),
            Box::new(NumberedParser::grouped()),
        ];
        for parser in all {
            parsers.insert(parser.mode(), parser);
        }
        Self { parsers }
    }

    /// Check if a mode has a parser available.
    #[must_use]
    pub fn supports(&self, mode: ParseMode) -> bool {
        self.parsers.contains_key(&mode)
    }

    /// Parse source text into chapters with the parser registered for `mode`.
    ///
    /// Modes without a parser produce no chapters.
    pub fn parse(
        &self,
        mode: ParseMode,
        source: &str,
        metadata: &BookMetadata,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Chapter> {
        match self.parsers.get(&mode) {
            Some(parser) => parser.parse_chapters(source, metadata, diagnostics),
            None => {
                tracing::error!(mode = %mode, "no parser registered");
                Vec::new()
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatcher_supports_all_modes() {
        let d = Dispatcher::new();
        for mode in ParseMode::ALL {
            assert!(d.supports(mode), "missing parser for {mode}");
        }
    }

    #[test]
    fn dispatcher_routes_by_mode() {
        let d = Dispatcher::new();
        let meta = BookMetadata::new("Book", "book");
        let source = "2.1 β\n1.1 α\n";

        let verse = d.parse(ParseMode::Verse, source, &meta, &mut Diagnostics::new());
        assert_eq!(verse.len(), 1);

        let keyed = d.parse(ParseMode::Keyed, source, &meta, &mut Diagnostics::new());
        assert_eq!(keyed[0].slug, "chapter-1");

        let grouped = d.parse(ParseMode::Grouped, source, &meta, &mut Diagnostics::new());
        assert_eq!(grouped[0].slug, "chapter-2");

        let prose = d.parse(ParseMode::Prose, source, &meta, &mut Diagnostics::new());
        assert!(prose.is_empty());
    }
}
