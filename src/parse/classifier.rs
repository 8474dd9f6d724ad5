//! Line classification.
//!
//! Every trimmed, non-empty line maps to exactly one [`LineKind`]. Patterns are
//! tried in priority order and the first match wins; anything unrecognised is
//! plain text and it is up to the assembler whether to keep or drop it.

use once_cell::sync::Lazy;
use regex::Regex;

static PART_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0\.0\s+(.+)$").unwrap());
static TITLE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)\.title\s+(.+)$").unwrap());
static VERSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\s+(.*)$").unwrap());
static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\w+)\]$").unwrap());

/// Label of a bracketed section header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLabel {
    Chapter,
    Vocab,
    Questions,
    Content,
    Unknown(String),
}

impl SectionLabel {
    fn parse(label: &str) -> Self {
        match label {
            "Chapter" => Self::Chapter,
            "Vocab" => Self::Vocab,
            "Questions" => Self::Questions,
            "Content" => Self::Content,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chapter => "Chapter",
            Self::Vocab => "Vocab",
            Self::Questions => "Questions",
            Self::Content => "Content",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

/// Key of a `Key: value` directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKey {
    Title,
    Gloss,
    TitleImage,
    Subtitle,
    Image,
}

impl DirectiveKey {
    const ALL: [DirectiveKey; 5] = [
        Self::Title,
        Self::Gloss,
        Self::TitleImage,
        Self::Subtitle,
        Self::Image,
    ];

    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Title => "Title:",
            Self::Gloss => "Gloss:",
            Self::TitleImage => "TitleImage:",
            Self::Subtitle => "Subtitle:",
            Self::Image => "Image:",
        }
    }
}

/// Chapter and verse digits exactly as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRef<'a> {
    pub chapter: &'a str,
    pub verse: &'a str,
}

impl VerseRef<'_> {
    /// Verse id formed by gluing the digit strings together (`2.1` -> 21).
    ///
    /// `1.23` and `12.3` both give 123. Ids beyond `u64` become 0.
    #[must_use]
    pub fn concatenated_id(&self) -> u64 {
        format!("{}{}", self.chapter, self.verse)
            .parse()
            .unwrap_or(0)
    }

    /// Numeric chapter and verse, or `None` if either overflows.
    #[must_use]
    pub fn numbers(&self) -> Option<(u32, u32)> {
        Some((self.chapter.parse().ok()?, self.verse.parse().ok()?))
    }
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `0.0 <text>`
    PartMarker { text: &'a str },
    /// `<n>.title <text>`; `chapter` is `None` when the number overflows.
    TitleMarker { chapter: Option<u32>, text: &'a str },
    /// `<c>.<v> <text>`
    Verse { reference: VerseRef<'a>, text: &'a str },
    /// `[Label]`
    SectionHeader(SectionLabel),
    /// `Key: value`
    Directive { key: DirectiveKey, value: &'a str },
    /// Anything else.
    Text,
}

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the raw input.
    pub number: usize,
    /// Trimmed line content.
    pub text: &'a str,
    pub kind: LineKind<'a>,
}

/// Classify one trimmed, non-empty line.
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(caps) = PART_MARKER.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::PartMarker { text };
    }
    if let Some(caps) = TITLE_MARKER.captures(line) {
        let chapter = caps[1].parse().ok();
        let text = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::TitleMarker { chapter, text };
    }
    if let Some(caps) = VERSE.captures(line) {
        let (Some(chapter), Some(verse), Some(text)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return LineKind::Text;
        };
        return LineKind::Verse {
            reference: VerseRef {
                chapter: chapter.as_str(),
                verse: verse.as_str(),
            },
            text: text.as_str(),
        };
    }
    if let Some(caps) = SECTION_HEADER.captures(line) {
        return LineKind::SectionHeader(SectionLabel::parse(&caps[1]));
    }
    for key in DirectiveKey::ALL {
        if let Some(rest) = line.strip_prefix(key.prefix()) {
            return LineKind::Directive {
                key,
                value: rest.trim(),
            };
        }
    }
    LineKind::Text
}

/// Split raw input into trimmed, non-empty, classified lines.
pub fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    source.split('\n').enumerate().filter_map(|(idx, raw)| {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Line {
            number: idx + 1,
            text,
            kind: classify(text),
        })
    })
}

/// Split a `|`-delimited record, returning trimmed fields only when there are
/// exactly `arity` of them.
#[must_use]
pub fn split_record(line: &str, arity: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    (fields.len() == arity).then_some(fields)
}
