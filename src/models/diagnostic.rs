use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a recoverable problem found while converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A Vocab/Questions line without the expected number of `|` fields.
    MalformedRecord,
    /// A Vocab/Questions section that produced no records.
    EmptySection,
    /// A section header or directive seen before any chapter exists.
    OutOfContext,
    /// A verse line whose numbers do not fit a verse id.
    MalformedVerse,
}

impl DiagnosticKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedRecord => "malformed_record",
            Self::EmptySection => "empty_section",
            Self::OutOfContext => "out_of_context",
            Self::MalformedVerse => "malformed_verse",
        }
    }
}

/// An advisory message attached to a conversion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based source line, when the problem is tied to one line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Number of chapters created when the problem was seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            chapter: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn in_chapter(mut self, chapter: usize) -> Self {
        self.chapter = Some(chapter);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_when_known() {
        let d = Diagnostic::new(DiagnosticKind::MalformedRecord, "bad vocab line").at_line(7);
        assert_eq!(d.to_string(), "line 7: bad vocab line");
    }

    #[test]
    fn display_without_line() {
        let d = Diagnostic::new(DiagnosticKind::EmptySection, "Empty [Vocab] section in chapter 2")
            .in_chapter(2);
        assert_eq!(d.to_string(), "Empty [Vocab] section in chapter 2");
        assert_eq!(d.chapter, Some(2));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&DiagnosticKind::OutOfContext).unwrap();
        assert_eq!(json, "\"out_of_context\"");
        assert_eq!(DiagnosticKind::OutOfContext.as_str(), "out_of_context");
    }
}
